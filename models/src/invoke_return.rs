use crate::marshalled_error::MarshalledError;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The only value that crosses the boundary as the reply to a multiplexed request.
///
/// Serialized externally tagged, which yields exactly `{ "result": … }` or
/// `{ "error": { name, message, errorNumber, stack? } }`. An object carrying both keys (or
/// neither) does not deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpcInvokeReturn {
    Result(Value),
    Error(MarshalledError),
}

impl IpcInvokeReturn {
    pub fn is_error(&self) -> bool {
        matches!(self, IpcInvokeReturn::Error(_))
    }

    pub fn into_result(self) -> Result<Value, MarshalledError> {
        match self {
            IpcInvokeReturn::Result(value) => Ok(value),
            IpcInvokeReturn::Error(error) => Err(error),
        }
    }
}

impl From<Result<Value, MarshalledError>> for IpcInvokeReturn {
    fn from(outcome: Result<Value, MarshalledError>) -> Self {
        match outcome {
            Ok(value) => IpcInvokeReturn::Result(value),
            Err(error) => IpcInvokeReturn::Error(error),
        }
    }
}
