use bridge_core::error::CoreError;
use bridge_core::error::dispatch::DispatchError;
use bridge_core::error::ipc::IpcError;
use bridge_core::marshal::{RemoteError, marshal, unmarshal};

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Verifies error text carries kind, message and raise site.
///
/// **WHY THIS MATTERS**: Logged errors are the main debugging aid across the process boundary;
/// without the location nobody can tell where a marshalled failure started.
#[test]
fn given_ipc_error_when_displayed_then_kind_message_and_location() {
    // GIVEN: A transport error raised here
    let error = IpcError::Transport {
        message: "link dropped".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Rendered
    let rendered = error.to_string();

    // THEN: All three parts are present
    assert!(rendered.starts_with("Transport Error: link dropped ["));
    assert!(rendered.contains("error.rs:"));
}

#[test]
fn given_core_error_when_displayed_then_inner_text_unchanged() {
    let inner = DispatchError::UnknownMethod {
        message: "unknown method 'x'".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };
    let expected = inner.to_string();

    let core = CoreError::from(inner);

    assert_eq!(core.to_string(), expected);
}

/// **VALUE**: Verifies a crate error keeps its type name and message through the codec.
#[test]
fn given_dispatch_error_when_marshalled_then_name_message_and_stack_kept() {
    let error = DispatchError::InvalidArguments {
        message: "argument 0: invalid type".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    let remote = unmarshal(marshal(&error));

    assert_eq!(remote.name(), "DispatchError");
    assert_eq!(remote.message(), error.to_string());
    assert!(remote.stack().is_some_and(|stack| stack.contains("    at ")));
}

/// **VALUE**: Verifies relaying a remote failure does not rename it.
///
/// **BUG THIS CATCHES**: Would catch a failure forwarded through a second hop coming back named
/// `IpcError` instead of its original name.
#[test]
fn given_relayed_remote_error_when_marshalled_then_original_identity_kept() {
    let original = RemoteError::new("disk full")
        .with_name("QuotaError")
        .with_error_number(28)
        .with_stack("    at write");
    let relayed = IpcError::Remote {
        source: original.clone(),
        location: ErrorLocation::from(Location::caller()),
    };

    let remote = unmarshal(marshal(&relayed));

    assert_eq!(remote, original);
    assert_eq!(remote.to_string(), "QuotaError: disk full");
}
