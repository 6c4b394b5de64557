use crate::error::CoreError;
use crate::error::dispatch::DispatchError;
use crate::error::ipc::IpcError;
use crate::marshal::{
    RemoteError, concrete_type_name, marshal, marshal_dyn, marshal_panic, unmarshal,
};

use common::ErrorLocation;
use models::UNKNOWN_ERROR_NAME;

use std::error::Error;
use std::io::{Error as IoError, ErrorKind};
use std::panic::Location;

/// **VALUE**: Verifies the core round-trip property: the message survives marshalling.
///
/// **WHY THIS MATTERS**: The app reports `message` to the user. If it changed on the way
/// through, remote failures would be undiagnosable.
#[test]
fn given_any_error_when_round_tripped_then_message_preserved() {
    // GIVEN: A plain std error
    let original = "x".parse::<u32>().expect_err("not a number");

    // WHEN: Marshalling then unmarshalling
    let rebuilt = unmarshal(marshal(&original));

    // THEN: Message is identical, name is the concrete type
    assert_eq!(rebuilt.message(), original.to_string());
    assert_eq!(rebuilt.name(), "ParseIntError");
    assert_eq!(rebuilt.error_number(), 0);
}

/// **VALUE**: Verifies that a `RemoteError` keeps its explicit identity.
///
/// **BUG THIS CATCHES**: Would catch the type-name fallback overriding a name the handler
/// chose on purpose, or the error number being dropped.
#[test]
fn given_remote_error_when_marshalled_then_keeps_name_number_and_stack() {
    let original = RemoteError::new("div by zero")
        .with_name("RangeError")
        .with_error_number(42)
        .with_stack("    at calc.rs:1:1");

    let marshalled = marshal(&original);

    assert_eq!(marshalled.name, "RangeError");
    assert_eq!(marshalled.message, "div by zero");
    assert_eq!(marshalled.error_number, 42);
    assert_eq!(marshalled.stack.as_deref(), Some("    at calc.rs:1:1"));
    assert_eq!(unmarshal(marshalled), original);
}

#[test]
fn given_crate_error_when_marshalled_then_stack_is_raise_site() {
    let location = ErrorLocation::from(Location::caller());
    let original = DispatchError::UnknownMethod {
        message: "unknown method 'nope'".to_string(),
        location,
    };

    let marshalled = marshal(&original);

    assert_eq!(marshalled.name, "DispatchError");
    assert_eq!(marshalled.stack, Some(location.stack_frame()));
}

/// **VALUE**: Verifies that the `source()` chain ends up in the stack.
///
/// **WHY THIS MATTERS**: Config and IO failures wrap the OS error; without the chain the
/// remote side only sees the outer message.
#[test]
fn given_error_with_source_when_marshalled_then_stack_lists_causes() {
    let original = crate::error::config::ConfigError::Read {
        location: ErrorLocation::from(Location::caller()),
        path: "bridge.json".into(),
        source: IoError::new(ErrorKind::PermissionDenied, "permission denied"),
    };

    let marshalled = marshal(&original);

    let stack = marshalled.stack.expect("stack");
    assert!(stack.contains("caused by: permission denied"));
}

#[test]
fn given_type_erased_error_when_marshalled_then_unknown_name() {
    let original: Box<dyn Error> = Box::new(IoError::other("disk on fire"));

    let marshalled = marshal_dyn(original.as_ref());

    assert_eq!(marshalled.name, UNKNOWN_ERROR_NAME);
    assert_eq!(marshalled.message, "disk on fire");
    assert_eq!(marshalled.stack, None);
}

#[test]
fn given_type_erased_remote_error_when_marshalled_then_keeps_name() {
    let original: Box<dyn Error> = Box::new(RemoteError::new("nope").with_name("TypeError"));

    assert_eq!(marshal_dyn(original.as_ref()).name, "TypeError");
}

/// **VALUE**: Verifies `CoreError` is unwrapped to the variant it carries.
///
/// **BUG THIS CATCHES**: Would catch every built-in failure being reported as `CoreError`,
/// hiding whether dispatch, transport or config went wrong.
#[test]
fn given_core_error_when_marshalled_then_uses_inner_type_name() {
    let original = CoreError::from(IpcError::Unavailable {
        message: "no dialog".to_string(),
        location: ErrorLocation::from(Location::caller()),
    });

    let marshalled = marshal(&original);

    assert_eq!(marshalled.name, "IpcError");
    assert!(marshalled.message.contains("no dialog"));
}

#[test]
fn given_relayed_remote_failure_when_marshalled_then_original_identity_kept() {
    let original = IpcError::Remote {
        source: RemoteError::new("div by zero").with_name("RangeError"),
        location: ErrorLocation::from(Location::caller()),
    };

    let marshalled = marshal(&original);

    assert_eq!(marshalled.name, "RangeError");
    assert_eq!(marshalled.message, "div by zero");
}

#[test]
fn given_panic_payloads_when_marshalled_then_named_panic() {
    assert_eq!(marshal_panic(Box::new("boom")).message, "boom");
    assert_eq!(marshal_panic(Box::new("boom".to_string())).message, "boom");
    assert_eq!(marshal_panic(Box::new(7_u8)).name, "Panic");
}

#[test]
fn given_remote_error_when_displayed_then_name_prefixes_message() {
    assert_eq!(RemoteError::new("boom").to_string(), "Error: boom");
    assert_eq!(RemoteError::new("boom").with_name("").to_string(), "boom");
}

#[test]
fn given_generic_and_trait_object_types_when_named_then_short_or_none() {
    assert_eq!(concrete_type_name::<Vec<u8>>().as_deref(), Some("Vec"));
    assert_eq!(concrete_type_name::<dyn Error>(), None);
}
