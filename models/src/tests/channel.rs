use crate::channel::{IPC_CHANNEL_PREFIX, IpcAppChannel, IpcHostChannel, WireChannel, ipc_channel};
use crate::error::model_error::ModelError;

/// **VALUE**: Verifies that the namespace mapping is deterministic.
///
/// **WHY THIS MATTERS**: Host and app compute wire names independently. If the same logical
/// name ever mapped to two different wire names, registrations and sends would silently miss
/// each other.
#[test]
fn given_same_channel_when_mapped_repeatedly_then_wire_name_is_stable() {
    // GIVEN: A logical channel
    let channel = "calculator";

    // WHEN: Mapping it several times
    let first = ipc_channel(channel);
    let second = ipc_channel(channel);

    // THEN: Identical wire names, carrying the prefix
    assert_eq!(first, second);
    assert_eq!(first.as_str(), "ipc.calculator");
}

/// **VALUE**: Verifies injectivity on names that only differ around the prefix.
///
/// **BUG THIS CATCHES**: Would catch a mapping that strips or deduplicates an existing
/// `ipc.` prefix, collapsing `"x"` and `"ipc.x"` onto the same wire name.
#[test]
fn given_distinct_channels_when_mapped_then_wire_names_never_collide() {
    // GIVEN: Logical names designed to collide under a sloppy mapping
    let names = ["x", "ipc.x", "ipc-x", "", "X"];

    // WHEN: Mapping all of them
    let mut wires: Vec<String> = names
        .iter()
        .map(|name| ipc_channel(name).as_str().to_string())
        .collect();
    wires.sort();
    wires.dedup();

    // THEN: Every logical name kept its own wire name
    assert_eq!(wires.len(), names.len(), "Wire names must be unique");
}

#[test]
fn given_wire_channel_when_logical_requested_then_prefix_is_removed() {
    let wire = ipc_channel("ipcHost-dialog");

    assert_eq!(wire.logical(), "ipcHost-dialog");
}

/// **VALUE**: Verifies that the transport-side guard rejects un-namespaced names.
///
/// **WHY THIS MATTERS**: A transport decoding frames from the other process must not let a
/// raw, un-prefixed name reach the listener tables.
#[test]
fn given_raw_name_without_prefix_when_parsed_then_returns_illegal_channel() {
    // GIVEN: A name missing the prefix
    let raw = "ipc-host";

    // WHEN: Parsing it as a wire name
    let result = WireChannel::parse(raw);

    // THEN: IllegalChannel, naming the offending channel
    match result {
        Err(ModelError::IllegalChannel { message, .. }) => {
            assert!(message.contains("illegal channel name 'ipc-host'"));
        }
        other => panic!("Expected IllegalChannel, got {other:?}"),
    }
}

#[test]
fn given_prefixed_name_when_parsed_then_equals_mapped_channel() {
    let parsed = WireChannel::parse("ipc.ipc-host").expect("prefixed name should parse");

    assert_eq!(parsed, ipc_channel("ipc-host"));
}

/// **VALUE**: Verifies that the compile-time wire names of the built-in channels agree with the
/// runtime mapping.
///
/// **BUG THIS CATCHES**: Would catch someone editing a built-in name in one place only.
#[test]
fn given_builtin_channels_when_compared_then_const_wire_names_match_mapping() {
    for channel in [
        IpcHostChannel::Functions,
        IpcHostChannel::HostNotify,
        IpcHostChannel::Dialog,
    ] {
        assert_eq!(ipc_channel(channel.as_str()).as_str(), channel.wire_name());
        assert!(channel.wire_name().starts_with(IPC_CHANNEL_PREFIX));
    }

    assert_eq!(
        ipc_channel(IpcAppChannel::AppNotify.as_str()).as_str(),
        IpcAppChannel::AppNotify.wire_name()
    );
}

#[test]
fn given_builtin_channels_then_use_expected_logical_names() {
    assert_eq!(IpcHostChannel::Functions.as_str(), "ipc-host");
    assert_eq!(IpcHostChannel::HostNotify.as_str(), "ipcHost-notify");
    assert_eq!(IpcHostChannel::Dialog.as_str(), "ipcHost-dialog");
    assert_eq!(IpcAppChannel::AppNotify.as_str(), "ipcApp-notify");
}
