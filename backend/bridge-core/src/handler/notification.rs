use crate::error::dispatch::DispatchError;
use crate::handler::args::FromArgs;
use crate::handler::split_method_name;
use crate::socket::{IpcEvent, IpcListener, IpcSocket, RemoveFunction};

use common::ErrorLocation;
use models::ipc_channel;

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FormatResult};
use std::panic::{AssertUnwindSafe, Location, catch_unwind};
use std::sync::Arc;

use log::{error, info};
use serde_json::Value;

type NotificationMethod<H> = Arc<dyn Fn(&H, &[Value]) -> Result<(), DispatchError> + Send + Sync>;

/// A fire-and-forget service listening on a single channel.
///
/// Used in both directions: the host registers one for `ipcHost-notify`, every app registers
/// one for `ipcApp-notify`. Methods run synchronously on the transport's delivery path.
pub trait NotificationHandler: Send + Sync + 'static {
    fn channel_name(&self) -> &str;

    fn methods() -> NotificationMethods<Self>
    where
        Self: Sized;
}

/// Method table of a [`NotificationHandler`].
pub struct NotificationMethods<H> {
    methods: HashMap<String, NotificationMethod<H>>,
}

impl<H> NotificationMethods<H>
where
    H: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    pub fn method<A, F>(mut self, name: &str, method: F) -> Self
    where
        A: FromArgs,
        F: Fn(&H, A) + Send + Sync + 'static,
    {
        let entry = move |handler: &H, args: &[Value]| -> Result<(), DispatchError> {
            method(handler, A::from_args(args)?);
            Ok(())
        };
        self.methods.insert(name.to_string(), Arc::new(entry));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl<H> Default for NotificationMethods<H>
where
    H: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Debug for NotificationMethods<H> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        let mut names: Vec<&String> = self.methods.keys().collect();
        names.sort();
        formatter
            .debug_struct("NotificationMethods")
            .field("methods", &names)
            .finish()
    }
}

/// Owns one registered [`NotificationHandler`] and routes notifications to its method table.
pub struct NotificationDispatcher<H> {
    handler: Arc<H>,
    methods: Arc<NotificationMethods<H>>,
}

impl<H> Clone for NotificationDispatcher<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            methods: Arc::clone(&self.methods),
        }
    }
}

impl<H> NotificationDispatcher<H>
where
    H: NotificationHandler,
{
    pub fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
            methods: Arc::new(H::methods()),
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Runs the method named by the first argument.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the method name is missing or unknown, or the remaining
    /// arguments do not decode into the method's parameters.
    pub fn dispatch(&self, event: &IpcEvent, args: &[Value]) -> Result<(), DispatchError> {
        let (name, rest) = split_method_name(event, args)?;

        let Some(method) = self.methods.methods.get(name) else {
            return Err(DispatchError::UnknownMethod {
                message: format!("unknown method '{}' on channel '{}'", name, event.channel),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        method(&self.handler, rest)
    }

    /// Listener that dispatches every delivery and logs failures instead of propagating them,
    /// so a bad notification never takes down the delivery loop.
    pub fn into_listener(self) -> IpcListener {
        IpcListener::new(move |event: &IpcEvent, args: &[Value]| {
            match catch_unwind(AssertUnwindSafe(|| self.dispatch(event, args))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Notification on '{}' dropped: {}", event.channel, e),
                Err(_) => error!("Notification handler on '{}' panicked", event.channel),
            }
        })
    }
}

/// Attaches `handler` to its channel on `socket`. One listener per registration.
pub fn register_notification_handler<S, H>(socket: &S, handler: H) -> RemoveFunction
where
    S: IpcSocket + ?Sized,
    H: NotificationHandler,
{
    let channel = ipc_channel(handler.channel_name());
    info!("Registering notification handler on '{}'", channel);
    let listener = NotificationDispatcher::new(handler).into_listener();
    socket.add_listener(&channel, listener)
}
