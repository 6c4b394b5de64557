use common::ErrorLocation;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ModelError {
    #[error("Illegal Channel Error: {message} {location}")]
    IllegalChannel {
        message: String,
        location: ErrorLocation,
    },

    #[error("Unknown Dialog Method Error: {message} {location}")]
    UnknownDialogMethod {
        message: String,
        location: ErrorLocation,
    },
}
