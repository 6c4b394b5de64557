//! Channel namespace shared by the host and app sides.
//!
//! Callers always speak in logical channel names (`"ipc-host"`, `"my-service"`). The only way
//! to obtain the name the transport sees is [`ipc_channel`], which prefixes the logical name
//! with [`IPC_CHANNEL_PREFIX`]. Both processes link this module, so the mapping cannot drift
//! between them.

use crate::error::model_error::ModelError;

use common::ErrorLocation;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;

use const_format::concatcp;
use serde::Serialize;

/// Prefix every wire-level channel name carries.
pub const IPC_CHANNEL_PREFIX: &str = "ipc.";

/// Serving method of the dialog channel. The accessed dialog method travels as its first argument.
pub const DIALOG_FUNCTION: &str = "callDialog";

const HOST_FUNCTIONS: &str = "ipc-host";
const HOST_NOTIFY: &str = "ipcHost-notify";
const HOST_DIALOG: &str = "ipcHost-dialog";
const APP_NOTIFY: &str = "ipcApp-notify";

/// Maps a logical channel name to its wire name.
///
/// Pure prefix concatenation: deterministic, total, and injective (two distinct logical
/// names never share a wire name).
pub fn ipc_channel(channel: &str) -> WireChannel {
    WireChannel(format!("{IPC_CHANNEL_PREFIX}{channel}"))
}

/// A channel name as it appears on the transport.
///
/// There is no public constructor besides [`ipc_channel`] and the validating
/// [`WireChannel::parse`], so registration APIs can never be handed an un-namespaced name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WireChannel(String);

impl WireChannel {
    /// Validates a raw name received from the other process.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::IllegalChannel`] if the name does not carry the `ipc.` prefix.
    #[track_caller]
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        if !raw.starts_with(IPC_CHANNEL_PREFIX) {
            return Err(ModelError::IllegalChannel {
                message: format!("illegal channel name '{raw}'"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The logical name this wire name was produced from.
    pub fn logical(&self) -> &str {
        &self.0[IPC_CHANNEL_PREFIX.len()..]
    }
}

impl Display for WireChannel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(&self.0)
    }
}

impl AsRef<str> for WireChannel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Channels served by the host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpcHostChannel {
    /// Request channel with the host's built-in functions (`ping`).
    Functions,
    /// Notification channel the app uses to poke the host.
    HostNotify,
    /// Request channel forwarding to the native dialog capability.
    Dialog,
}

impl IpcHostChannel {
    pub const fn as_str(self) -> &'static str {
        match self {
            IpcHostChannel::Functions => HOST_FUNCTIONS,
            IpcHostChannel::HostNotify => HOST_NOTIFY,
            IpcHostChannel::Dialog => HOST_DIALOG,
        }
    }

    /// Compile-time wire name; always equal to `ipc_channel(self.as_str())`.
    pub const fn wire_name(self) -> &'static str {
        match self {
            IpcHostChannel::Functions => concatcp!(IPC_CHANNEL_PREFIX, HOST_FUNCTIONS),
            IpcHostChannel::HostNotify => concatcp!(IPC_CHANNEL_PREFIX, HOST_NOTIFY),
            IpcHostChannel::Dialog => concatcp!(IPC_CHANNEL_PREFIX, HOST_DIALOG),
        }
    }
}

impl AsRef<str> for IpcHostChannel {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for IpcHostChannel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

/// Channels served by app processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpcAppChannel {
    /// Notification channel the host uses to poke every app.
    AppNotify,
}

impl IpcAppChannel {
    pub const fn as_str(self) -> &'static str {
        match self {
            IpcAppChannel::AppNotify => APP_NOTIFY,
        }
    }

    pub const fn wire_name(self) -> &'static str {
        match self {
            IpcAppChannel::AppNotify => concatcp!(IPC_CHANNEL_PREFIX, APP_NOTIFY),
        }
    }
}

impl AsRef<str> for IpcAppChannel {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for IpcAppChannel {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}
