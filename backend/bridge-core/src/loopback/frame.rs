//! JSON frames exchanged by the loopback ends.

use crate::error::ipc::IpcError;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub(crate) enum Frame {
    Message {
        channel: String,
        args: Vec<Value>,
    },
    Invoke {
        request_id: Uuid,
        channel: String,
        args: Vec<Value>,
    },
    Reply {
        request_id: Uuid,
        outcome: ReplyOutcome,
    },
}

/// Transport-level result of an invoke. `Failure` never carries a handler error; those travel
/// inside `Value` as an invoke result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) enum ReplyOutcome {
    Value(Value),
    Failure(String),
}

impl Frame {
    pub(crate) fn encode(&self) -> Result<String, IpcError> {
        Ok(serde_json::to_string(self)?)
    }

    pub(crate) fn decode(raw: &str) -> Result<Self, IpcError> {
        Ok(serde_json::from_str(raw)?)
    }
}
