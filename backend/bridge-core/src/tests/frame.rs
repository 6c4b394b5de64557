use crate::loopback::frame::{Frame, ReplyOutcome};

use serde_json::{Value, json};
use uuid::Uuid;

/// **VALUE**: Pins the frame layout: `kind` tag, camelCase fields.
///
/// **WHY THIS MATTERS**: Frames are the loopback's wire format. Changing it silently would
/// make recorded frames in tests and logs unreadable.
#[test]
fn given_invoke_frame_when_encoded_then_tagged_by_kind_with_camel_case_fields() {
    // GIVEN: An invoke frame
    let request_id = Uuid::new_v4();
    let frame = Frame::Invoke {
        request_id,
        channel: "ipc.calc".to_string(),
        args: vec![json!("divide"), json!(4), json!(2)],
    };

    // WHEN: Encoding
    let encoded: Value = serde_json::from_str(&frame.encode().expect("encode")).expect("json");

    // THEN: Internally tagged, camelCase
    assert_eq!(
        encoded,
        json!({
            "kind": "invoke",
            "requestId": request_id.to_string(),
            "channel": "ipc.calc",
            "args": ["divide", 4, 2],
        })
    );
}

#[test]
fn given_reply_frame_when_decoded_then_outcome_preserved() {
    let request_id = Uuid::new_v4();
    let raw = format!(
        r#"{{"kind":"reply","requestId":"{request_id}","outcome":{{"failure":"No handler registered for 'ipc.x'"}}}}"#
    );

    let frame = Frame::decode(&raw).expect("decode");

    assert_eq!(
        frame,
        Frame::Reply {
            request_id,
            outcome: ReplyOutcome::Failure("No handler registered for 'ipc.x'".to_string()),
        }
    );
}

#[test]
fn given_unknown_kind_when_decoded_then_serialization_error() {
    let result = Frame::decode(r#"{"kind":"teleport","channel":"ipc.x"}"#);

    assert!(result.is_err());
}
