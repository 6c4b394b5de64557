use bridge_core::error::config::ConfigError;
use bridge_core::error::ipc::IpcError;

use common::ErrorLocation;

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the `ipc-bridge` binary.
///
/// Library errors are flattened to their text so the whole value stays serializable.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum BridgeHostError {
    /// Error from this binary's own setup (directories, logger).
    #[error("Bridge Host Error: {message} {location}")]
    Host {
        message: String,
        location: ErrorLocation,
    },

    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// Error from the dispatch layer (transport, remote failure, protocol).
    #[error("Ipc Error: {message} {location}")]
    Ipc {
        message: String,
        location: ErrorLocation,
    },

    /// A bounded call did not answer in time.
    #[error("Timeout Error: {message} {location}")]
    Timeout {
        message: String,
        location: ErrorLocation,
    },
}

impl From<ConfigError> for BridgeHostError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        BridgeHostError::Config {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<IpcError> for BridgeHostError {
    #[track_caller]
    fn from(error: IpcError) -> Self {
        BridgeHostError::Ipc {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
