use common::ErrorLocation;

use thiserror::Error as ThisError;

/// Failures raised while routing a multiplexed message to a handler method.
#[derive(Debug, ThisError)]
pub enum DispatchError {
    /// The payload did not start with a method name.
    #[error("Missing Method Name Error: {message} {location}")]
    MissingMethodName {
        message: String,
        location: ErrorLocation,
    },

    /// The handler's method table has no entry for the requested name.
    #[error("Unknown Method Error: {message} {location}")]
    UnknownMethod {
        message: String,
        location: ErrorLocation,
    },

    /// The arguments could not be decoded into the method's parameter types.
    #[error("Invalid Arguments Error: {message} {location}")]
    InvalidArguments {
        message: String,
        location: ErrorLocation,
    },
}

impl DispatchError {
    pub fn location(&self) -> ErrorLocation {
        match self {
            DispatchError::MissingMethodName { location, .. }
            | DispatchError::UnknownMethod { location, .. }
            | DispatchError::InvalidArguments { location, .. } => *location,
        }
    }
}
