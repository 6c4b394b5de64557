//! App dispatch registry.

pub mod handlers;
pub mod proxy;
pub mod stubs;

pub use handlers::IpcAppNotifyHandler;
pub use proxy::{IpcFunctionProxy, IpcProxy};
pub use stubs::{DialogProxy, HostFunctionsProxy};

use crate::error::ipc::IpcError;
use crate::handler::{NotificationHandler, register_notification_handler};
use crate::marshal::unmarshal;
use crate::socket::{IpcListener, IpcSocketFrontend, RemoveFunction};

use common::ErrorLocation;
use models::{IpcHostChannel, IpcInvokeReturn, ipc_channel};

use std::fmt::{Debug, Formatter, Result as FormatResult};
use std::panic::Location;
use std::sync::{Arc, PoisonError, RwLock};

use log::info;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Default)]
struct AppState {
    socket: Option<Arc<dyn IpcSocketFrontend>>,
    notifications: Option<RemoveFunction>,
}

/// App side of the bridge.
///
/// Cheap to clone; clones share one transport slot.
#[derive(Clone, Default)]
pub struct IpcApp {
    state: Arc<RwLock<AppState>>,
}

impl IpcApp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of the transport and listens for host notifications with
    /// [`IpcAppNotifyHandler`].
    pub fn startup(&self, socket: Arc<dyn IpcSocketFrontend>) -> Result<(), IpcError> {
        self.startup_with_notifications(socket, IpcAppNotifyHandler)
    }

    /// Like [`startup`](IpcApp::startup) with a custom `ipcApp-notify` handler.
    pub fn startup_with_notifications<H>(
        &self,
        socket: Arc<dyn IpcSocketFrontend>,
        handler: H,
    ) -> Result<(), IpcError>
    where
        H: NotificationHandler,
    {
        let previous = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.socket = Some(Arc::clone(&socket));
            state.notifications.take()
        };
        if let Some(previous) = previous {
            previous.remove();
        }

        let registration = register_notification_handler(socket.as_ref(), handler);
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .notifications = Some(registration);

        info!("IPC app started");
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .socket
            .is_some()
    }

    /// Sends a request and waits for the raw reply.
    ///
    /// # Errors
    ///
    /// [`IpcError::Transport`] if nothing serves `channel` or the connection drops.
    pub async fn invoke(&self, channel: &str, args: Vec<Value>) -> Result<Value, IpcError> {
        let socket = self.socket()?;
        socket.invoke(&ipc_channel(channel), args).await
    }

    pub fn send(&self, channel: &str, args: Vec<Value>) -> Result<(), IpcError> {
        self.socket()?.send(&ipc_channel(channel), args);
        Ok(())
    }

    pub fn add_listener(
        &self,
        channel: &str,
        listener: IpcListener,
    ) -> Result<RemoveFunction, IpcError> {
        Ok(self.socket()?.add_listener(&ipc_channel(channel), listener))
    }

    pub fn once(&self, channel: &str, listener: IpcListener) -> Result<(), IpcError> {
        self.socket()?.once(&ipc_channel(channel), listener);
        Ok(())
    }

    pub fn remove_listener(&self, channel: &str, listener: &IpcListener) -> Result<(), IpcError> {
        self.socket()?.remove_listener(&ipc_channel(channel), listener);
        Ok(())
    }

    /// Sends `(method, ...args)` on `ipcHost-notify`.
    pub fn notify_host(&self, method: &str, args: Vec<Value>) -> Result<(), IpcError> {
        let mut payload = Vec::with_capacity(args.len() + 1);
        payload.push(Value::String(method.to_string()));
        payload.extend(args);
        self.send(IpcHostChannel::HostNotify.as_str(), payload)
    }

    /// Calls `method` of the request handler serving `channel`.
    ///
    /// # Errors
    ///
    /// - [`IpcError::Remote`] when the handler failed; carries the reconstructed failure
    /// - [`IpcError::Protocol`] when the reply is not an invoke result
    /// - anything [`invoke`](IpcApp::invoke) returns
    pub async fn call_ipc_channel(
        &self,
        channel: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, IpcError> {
        let mut payload = Vec::with_capacity(args.len() + 1);
        payload.push(Value::String(method.to_string()));
        payload.extend(args);

        let reply = self.invoke(channel, payload).await?;
        let reply: IpcInvokeReturn =
            serde_json::from_value(reply).map_err(|e| IpcError::Protocol {
                message: format!("invalid reply from '{channel}.{method}': {e}"),
                location: ErrorLocation::from(Location::caller()),
            })?;

        reply.into_result().map_err(|error| IpcError::Remote {
            source: unmarshal(error),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// [`call_ipc_channel`](IpcApp::call_ipc_channel) with the result decoded as `R`.
    pub async fn call_ipc_channel_as<R>(
        &self,
        channel: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<R, IpcError>
    where
        R: DeserializeOwned,
    {
        let value = self.call_ipc_channel(channel, method, args).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn proxy(&self, channel: &str) -> IpcProxy {
        IpcProxy::new(self.clone(), channel)
    }

    pub fn function_proxy(&self, channel: &str, function: &str) -> IpcFunctionProxy {
        IpcFunctionProxy::new(self.clone(), channel, function)
    }

    pub fn host_functions(&self) -> HostFunctionsProxy {
        HostFunctionsProxy::new(self)
    }

    pub fn dialog(&self) -> DialogProxy {
        DialogProxy::new(self)
    }

    /// Drops the transport. The notification listener stays registered on it.
    pub fn shutdown(&self) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .socket = None;
        info!("IPC app shut down");
    }

    #[track_caller]
    fn socket(&self) -> Result<Arc<dyn IpcSocketFrontend>, IpcError> {
        let socket = self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .socket
            .clone();
        socket.ok_or(IpcError::NotStarted {
            message: "IpcApp has no transport; call startup first".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl Debug for IpcApp {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter
            .debug_struct("IpcApp")
            .field("started", &self.is_valid())
            .finish()
    }
}
