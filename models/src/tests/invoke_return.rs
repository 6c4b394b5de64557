use crate::invoke_return::IpcInvokeReturn;
use crate::marshalled_error::MarshalledError;

use serde_json::{Value, json};

/// **VALUE**: Verifies the `{ "result": … }` wire shape.
///
/// **WHY THIS MATTERS**: The app side decodes replies by key. Any other layout (an internal
/// tag, a wrapper struct) breaks every request channel at once.
#[test]
fn given_result_when_serialized_then_has_only_result_key() {
    // GIVEN: A successful outcome
    let invoke_return = IpcInvokeReturn::Result(json!({ "node": "20.0.0" }));

    // WHEN: Serializing
    let serialized = serde_json::to_value(&invoke_return).expect("serialize");

    // THEN: A single-key object
    assert_eq!(serialized, json!({ "result": { "node": "20.0.0" } }));
}

/// **VALUE**: Verifies the `{ "error": { name, message, errorNumber, stack? } }` wire shape.
///
/// **BUG THIS CATCHES**: Would catch a snake_case `error_number` key leaking onto the wire,
/// or an absent stack being serialized as `null`.
#[test]
fn given_error_without_stack_when_serialized_then_omits_stack_and_uses_camel_case() {
    // GIVEN: A failure without stack
    let invoke_return = IpcInvokeReturn::Error(MarshalledError::new("Error", "boom"));

    // WHEN: Serializing
    let serialized = serde_json::to_value(&invoke_return).expect("serialize");

    // THEN: camelCase keys, no stack key
    assert_eq!(
        serialized,
        json!({ "error": { "name": "Error", "message": "boom", "errorNumber": 0 } })
    );
}

#[test]
fn given_error_with_stack_when_serialized_then_keeps_stack_and_number() {
    let mut error = MarshalledError::new("RangeError", "out of range");
    error.error_number = 7;
    error.stack = Some("    at src/lib.rs:1:1".to_string());

    let serialized =
        serde_json::to_value(IpcInvokeReturn::Error(error.clone())).expect("serialize");
    let decoded: IpcInvokeReturn = serde_json::from_value(serialized.clone()).expect("decode");

    assert_eq!(serialized["error"]["stack"], "    at src/lib.rs:1:1");

    assert_eq!(decoded, IpcInvokeReturn::Error(error));
}

/// **VALUE**: Verifies that `result` and `error` are mutually exclusive on decode.
///
/// **WHY THIS MATTERS**: A reply carrying both keys is ambiguous. Accepting it would let a
/// caller silently ignore a failure.
#[test]
fn given_object_with_both_keys_when_decoded_then_fails() {
    // GIVEN: A malformed reply
    let raw = json!({
        "result": 1,
        "error": { "name": "Error", "message": "boom", "errorNumber": 0 }
    });

    // WHEN: Decoding
    let decoded = serde_json::from_value::<IpcInvokeReturn>(raw);

    // THEN: Rejected
    assert!(decoded.is_err(), "Both keys present must not decode");
}

#[test]
fn given_object_with_neither_key_when_decoded_then_fails() {
    let decoded = serde_json::from_value::<IpcInvokeReturn>(json!({}));

    assert!(decoded.is_err(), "Empty object must not decode");
}

#[test]
fn given_null_result_when_decoded_then_is_result_variant() {
    let decoded: IpcInvokeReturn =
        serde_json::from_value(json!({ "result": null })).expect("decode");

    assert_eq!(decoded, IpcInvokeReturn::Result(Value::Null));
    assert!(!decoded.is_error());
}

#[test]
fn given_error_missing_error_number_when_decoded_then_defaults_to_zero() {
    let decoded: IpcInvokeReturn =
        serde_json::from_value(json!({ "error": { "name": "Error", "message": "boom" } }))
            .expect("decode");

    match decoded.into_result() {
        Err(error) => assert_eq!(error.error_number, 0),
        Ok(value) => panic!("Expected error, got {value}"),
    }
}
