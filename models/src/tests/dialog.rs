use crate::dialog::{DialogMethod, MessageBoxOptions};
use crate::error::model_error::ModelError;

use serde_json::json;

#[test]
fn given_every_dialog_method_when_parsed_from_name_then_round_trips() {
    for method in DialogMethod::ALL {
        assert_eq!(DialogMethod::parse(method.as_str()).ok(), Some(method));
    }
}

/// **VALUE**: Verifies that names outside the dialog surface are refused.
///
/// **WHY THIS MATTERS**: The dialog channel forwards by method name. Anything not on the list
/// must fail loudly instead of reaching the native capability.
#[test]
fn given_unknown_method_when_parsed_then_returns_unknown_dialog_method() {
    // GIVEN/WHEN: An unsupported method name
    let result = DialogMethod::parse("showCertificateTrustDialog");

    // THEN: UnknownDialogMethod with the familiar wording
    match result {
        Err(ModelError::UnknownDialogMethod { message, .. }) => {
            assert!(message.contains("illegal dialog method"));
        }
        other => panic!("Expected UnknownDialogMethod, got {other:?}"),
    }
}

#[test]
fn given_message_box_options_when_serialized_then_uses_type_key_and_camel_case() {
    let options = MessageBoxOptions {
        message: "Save changes?".to_string(),
        kind: Some("question".to_string()),
        buttons: vec!["Yes".to_string(), "No".to_string()],
        default_id: Some(0),
        ..MessageBoxOptions::default()
    };

    let value = serde_json::to_value(&options).expect("serialize");

    assert_eq!(
        value,
        json!({
            "message": "Save changes?",
            "type": "question",
            "buttons": ["Yes", "No"],
            "defaultId": 0
        })
    );
}
