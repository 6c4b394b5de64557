//! Transport capability consumed by the registries.
//!
//! The dispatch layer never talks to a concrete IPC mechanism. Whatever carries the bytes
//! implements [`IpcSocketBackend`] on the host side and [`IpcSocketFrontend`] on the app side
//! and is handed to [`IpcHost::startup`](crate::host::IpcHost::startup) /
//! [`IpcApp::startup`](crate::app::IpcApp::startup). Every payload is a list of JSON values so
//! it can always be serialized by the transport.

use crate::error::ipc::IpcError;

use models::WireChannel;

use std::fmt::{Debug, Formatter, Result as FormatResult};
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::BoxFuture;
use serde_json::Value;
use uuid::Uuid;

/// Metadata delivered with every incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpcEvent {
    pub channel: WireChannel,
    /// Identifier of the peer that sent the message.
    pub sender: Uuid,
}

type ListenerCallback = dyn Fn(&IpcEvent, &[Value]) + Send + Sync;

/// A notification listener.
///
/// Listeners are compared by identity: a clone refers to the same registration, so the value
/// passed to `add_listener` can later be handed to `remove_listener`.
#[derive(Clone)]
pub struct IpcListener {
    id: Uuid,
    callback: Arc<ListenerCallback>,
}

impl IpcListener {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&IpcEvent, &[Value]) + Send + Sync + 'static,
    {
        Self {
            id: Uuid::new_v4(),
            callback: Arc::new(callback),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn call(&self, event: &IpcEvent, args: &[Value]) {
        (self.callback)(event, args)
    }
}

impl PartialEq for IpcListener {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for IpcListener {}

impl Debug for IpcListener {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter
            .debug_struct("IpcListener")
            .field("id", &self.id)
            .finish()
    }
}

/// Responder installed with `handle`: receives `(event, args)` and resolves to the reply.
pub type IpcRequestHandler =
    Arc<dyn Fn(IpcEvent, Vec<Value>) -> BoxFuture<'static, Value> + Send + Sync>;

/// Registration token returned by every add/handle operation.
///
/// The first [`remove`](RemoveFunction::remove) unregisters; later calls do nothing.
/// Dropping the token leaves the registration in place.
pub struct RemoveFunction {
    remove: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl RemoveFunction {
    pub fn new<F>(remove: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            remove: Mutex::new(Some(Box::new(remove))),
        }
    }

    /// A token with nothing to unregister.
    pub fn noop() -> Self {
        Self {
            remove: Mutex::new(None),
        }
    }

    pub fn remove(&self) {
        let remove = self
            .remove
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        // Called outside the lock so the closure may touch other registrations.
        if let Some(remove) = remove {
            remove();
        }
    }

    pub fn is_removed(&self) -> bool {
        self.remove
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

impl Debug for RemoveFunction {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter
            .debug_struct("RemoveFunction")
            .field("removed", &self.is_removed())
            .finish()
    }
}

/// Primitives available on both ends of the transport.
pub trait IpcSocket: Send + Sync {
    /// Fire-and-forget. Delivery is whatever the transport guarantees; nobody listening is not
    /// an error.
    fn send(&self, channel: &WireChannel, args: Vec<Value>);

    fn add_listener(&self, channel: &WireChannel, listener: IpcListener) -> RemoveFunction;

    /// Listener that is removed after its first delivery.
    fn once(&self, channel: &WireChannel, listener: IpcListener);

    fn remove_listener(&self, channel: &WireChannel, listener: &IpcListener);
}

/// App-side transport: adds request/response.
pub trait IpcSocketFrontend: IpcSocket {
    /// Sends a request and resolves with the responder's reply.
    ///
    /// Resolves to [`IpcError::Transport`] if no responder is registered for `channel` or the
    /// connection goes away before a reply arrives.
    fn invoke(
        &self,
        channel: &WireChannel,
        args: Vec<Value>,
    ) -> BoxFuture<'static, Result<Value, IpcError>>;
}

/// Host-side transport: serves requests.
pub trait IpcSocketBackend: IpcSocket {
    /// Installs the responder for `channel`, replacing any existing one.
    ///
    /// The returned token removes only the responder installed by this call.
    fn handle(&self, channel: &WireChannel, handler: IpcRequestHandler) -> RemoveFunction;
}
