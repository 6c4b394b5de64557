use crate::marshal::RemoteError;

use common::ErrorLocation;
use models::ModelError;

use std::panic::Location;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum IpcError {
    /// The registry holds no transport (never started, or shut down).
    #[error("Not Started Error: {message} {location}")]
    NotStarted {
        message: String,
        location: ErrorLocation,
    },

    /// The transport-level call failed: no responder, dropped connection, unroutable reply.
    #[error("Transport Error: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },

    /// The serving side reported a failure; `source` is its reconstruction.
    #[error("Remote Error: {source} {location}")]
    Remote {
        source: RemoteError,
        location: ErrorLocation,
    },

    /// The reply arrived but is not a valid invoke result.
    #[error("Protocol Error: {message} {location}")]
    Protocol {
        message: String,
        location: ErrorLocation,
    },

    #[error("Serialization Error: {message} {location}")]
    Serialization {
        message: String,
        location: ErrorLocation,
    },

    /// A built-in service was called but the host was started without its capability.
    #[error("Unavailable Error: {message} {location}")]
    Unavailable {
        message: String,
        location: ErrorLocation,
    },
}

impl IpcError {
    pub fn location(&self) -> ErrorLocation {
        match self {
            IpcError::NotStarted { location, .. }
            | IpcError::Transport { location, .. }
            | IpcError::Remote { location, .. }
            | IpcError::Protocol { location, .. }
            | IpcError::Serialization { location, .. }
            | IpcError::Unavailable { location, .. } => *location,
        }
    }

    /// The reconstructed remote failure, when this error carries one.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            IpcError::Remote { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for IpcError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        IpcError::Serialization {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ModelError> for IpcError {
    #[track_caller]
    fn from(error: ModelError) -> Self {
        IpcError::Protocol {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
