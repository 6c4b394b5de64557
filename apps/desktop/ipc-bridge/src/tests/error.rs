// Unit tests for error module
// Tests error serialization and conversion from library errors

use crate::error::BridgeHostError;

use bridge_core::error::config::ConfigError;
use bridge_core::error::ipc::IpcError;

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Tests that errors serialize with the `type`/`data` layout.
///
/// **WHY THIS MATTERS**: Anything reporting a failed start (logs, a supervising process)
/// reads the structured form. A layout change breaks those readers silently.
///
/// **BUG THIS CATCHES**: Would catch removing `#[derive(Serialize)]` or the serde tag
/// attributes.
#[test]
fn given_bridge_error_when_serialized_then_tagged_with_type_and_data() {
    // GIVEN: A BridgeHostError
    let err = BridgeHostError::Timeout {
        message: String::from("'ping' did not answer within 10 ms"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Serializing to JSON
    let value = serde_json::to_value(&err).expect("Error should be serializable");

    // THEN: Variant name under "type", fields under "data"
    assert_eq!(value["type"], "Timeout");
    assert_eq!(value["data"]["message"], "'ping' did not answer within 10 ms");
    assert!(value["data"]["location"]["line"].is_number());
}

#[test]
fn given_ipc_error_when_converted_then_message_keeps_original_text() {
    let ipc = IpcError::NotStarted {
        message: "IpcApp has no transport; call startup first".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };
    let original = ipc.to_string();

    let err = BridgeHostError::from(ipc);

    match err {
        BridgeHostError::Ipc { message, .. } => assert_eq!(message, original),
        other => panic!("expected Ipc, got {other:?}"),
    }
}

#[test]
fn given_config_error_when_converted_then_config_variant() {
    let config = ConfigError::Validation {
        location: ErrorLocation::from(Location::caller()),
        field: "version",
        reason: "Invalid version: 0 (expected 1-1)".to_string(),
    };

    let err = BridgeHostError::from(config);

    assert!(matches!(err, BridgeHostError::Config { .. }));
    assert!(err.to_string().starts_with("Config Error: Bridge Config Validation Error: version"));
}
