//! Wire-level data model for the ipc-bridge.
//!
//! This crate contains the plain data that crosses the process boundary and the
//! channel namespace both sides agree on. Nothing here talks to a transport.
//!
//! ## Architecture
//!
//! - **models** (this crate): channel names, invoke results, marshalled errors, payloads
//! - **bridge-core**: registries, dispatch tables, marshalling, proxies
//! - **ipc-bridge**: host binary wiring everything together

pub mod channel;
pub mod dialog;
pub mod error;
pub mod invoke_return;
pub mod marshalled_error;
pub mod notification;
pub mod versions;

pub use channel::{
    DIALOG_FUNCTION, IPC_CHANNEL_PREFIX, IpcAppChannel, IpcHostChannel, WireChannel, ipc_channel,
};
pub use error::model_error::ModelError;
pub use invoke_return::IpcInvokeReturn;
pub use marshalled_error::{MarshalledError, UNKNOWN_ERROR_NAME};
pub use notification::{AppNotification, HostNotification};
pub use versions::ProcessVersions;

#[cfg(test)]
mod tests;
