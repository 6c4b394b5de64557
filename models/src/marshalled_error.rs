use serde::{Deserialize, Serialize};

/// Name used when a failure has neither an explicit name nor a concrete type name.
pub const UNKNOWN_ERROR_NAME: &str = "Unknown Error";

/// Flattened, serializable snapshot of a failure raised while serving a request.
///
/// Carries diagnostic data only. The app side turns it back into a throwable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarshalledError {
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub error_number: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl MarshalledError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            error_number: 0,
            stack: None,
        }
    }
}
