//! Host dispatch registry.

pub mod capabilities;
pub mod handlers;

pub use capabilities::{NativeDialog, TrayController, UpdateChecker, WindowController};
pub use handlers::{DialogHandler, IpcHostHandler, IpcHostNotifyHandler};

use crate::error::ipc::IpcError;
use crate::handler::{
    IpcHandler, NotificationHandler, RequestDispatcher, register_notification_handler,
};
use crate::socket::{IpcEvent, IpcListener, IpcSocketBackend, RemoveFunction};

use common::ErrorLocation;
use models::{IpcAppChannel, ProcessVersions, ipc_channel};

use std::fmt::{Debug, Formatter, Result as FormatResult};
use std::future::Future;
use std::panic::Location;
use std::sync::{Arc, PoisonError, RwLock};

use futures_util::FutureExt;
use log::{debug, info};
use serde_json::Value;

/// Registration replayed by every [`IpcHost::startup`].
type StartupRegistration =
    Arc<dyn Fn(&IpcHost) -> Result<RemoveFunction, IpcError> + Send + Sync>;

/// Everything [`IpcHost::startup`] needs: the transport plus the optional native capabilities
/// the built-in services forward to.
#[derive(Clone)]
pub struct IpcHostOptions {
    pub socket: Arc<dyn IpcSocketBackend>,
    /// Answer of `ping`.
    pub versions: ProcessVersions,
    pub dialog: Option<Arc<dyn NativeDialog>>,
    pub window: Option<Arc<dyn WindowController>>,
    pub tray: Option<Arc<dyn TrayController>>,
    pub updater: Option<Arc<dyn UpdateChecker>>,
    registrations: Vec<StartupRegistration>,
}

impl IpcHostOptions {
    pub fn new(socket: Arc<dyn IpcSocketBackend>) -> Self {
        Self {
            socket,
            versions: ProcessVersions::current(),
            dialog: None,
            window: None,
            tray: None,
            updater: None,
            registrations: Vec::new(),
        }
    }

    /// Adds entries to the `ping` answer, overriding existing keys.
    pub fn with_versions(mut self, versions: ProcessVersions) -> Self {
        self.versions.merge(versions);
        self
    }

    pub fn with_dialog(mut self, dialog: Arc<dyn NativeDialog>) -> Self {
        self.dialog = Some(dialog);
        self
    }

    pub fn with_window_controller(mut self, window: Arc<dyn WindowController>) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_tray_controller(mut self, tray: Arc<dyn TrayController>) -> Self {
        self.tray = Some(tray);
        self
    }

    pub fn with_update_checker(mut self, updater: Arc<dyn UpdateChecker>) -> Self {
        self.updater = Some(updater);
        self
    }

    /// Serves a fresh `H` after the built-ins, on this and every later startup with these
    /// options.
    pub fn with_handler<H>(mut self) -> Self
    where
        H: IpcHandler + Default,
    {
        self.registrations
            .push(Arc::new(|host: &IpcHost| host.register::<H>()));
        self
    }

    /// Like [`with_handler`](IpcHostOptions::with_handler) for a notification handler.
    pub fn with_notification_handler<H>(mut self) -> Self
    where
        H: NotificationHandler + Default,
    {
        self.registrations
            .push(Arc::new(|host: &IpcHost| host.register_notification::<H>()));
        self
    }
}

#[derive(Default)]
struct HostState {
    socket: Option<Arc<dyn IpcSocketBackend>>,
    /// Built-ins plus the option-supplied handlers of the current startup.
    registrations: Vec<RemoveFunction>,
}

/// Host side of the bridge.
///
/// Cheap to clone; clones share the transport slot and the startup registrations. The slot
/// is either empty (before [`startup`](IpcHost::startup), after [`shutdown`](IpcHost::shutdown))
/// or holds one backend transport. `startup` and `shutdown` must not race each other.
#[derive(Clone, Default)]
pub struct IpcHost {
    state: Arc<RwLock<HostState>>,
}

impl IpcHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of the transport, registers the built-in services and then the handlers
    /// listed in `options`.
    ///
    /// Starting again replaces the transport; everything the previous startup registered is
    /// released first.
    pub fn startup(&self, options: IpcHostOptions) -> Result<(), IpcError> {
        let previous = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            state.socket = Some(Arc::clone(&options.socket));
            std::mem::take(&mut state.registrations)
        };
        for registration in previous {
            registration.remove();
        }

        let mut registrations = vec![
            self.register_handler(IpcHostHandler::new(options.versions))?,
            self.register_handler(DialogHandler::new(options.dialog))?,
            self.register_notification_handler(IpcHostNotifyHandler::new(
                options.window,
                options.tray,
                options.updater,
            ))?,
        ];
        for register in &options.registrations {
            registrations.push(register(self)?);
        }
        let extra = options.registrations.len();
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .registrations = registrations;

        info!("IPC host started with {} extra handler(s)", extra);
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .socket
            .is_some()
    }

    /// Fires `args` on `channel` to every connected app.
    pub fn send(&self, channel: &str, args: Vec<Value>) -> Result<(), IpcError> {
        self.socket()?.send(&ipc_channel(channel), args);
        Ok(())
    }

    /// Installs the responder for `channel`, superseding any previous one.
    pub fn handle<F, Fut>(&self, channel: &str, handler: F) -> Result<RemoveFunction, IpcError>
    where
        F: Fn(IpcEvent, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        let socket = self.socket()?;
        let channel = ipc_channel(channel);
        debug!("Installing responder on '{}'", channel);
        Ok(socket.handle(
            &channel,
            Arc::new(move |event: IpcEvent, args: Vec<Value>| {
                handler(event, args).boxed()
            }),
        ))
    }

    pub fn add_listener(
        &self,
        channel: &str,
        listener: IpcListener,
    ) -> Result<RemoveFunction, IpcError> {
        Ok(self.socket()?.add_listener(&ipc_channel(channel), listener))
    }

    pub fn remove_listener(&self, channel: &str, listener: &IpcListener) -> Result<(), IpcError> {
        self.socket()?.remove_listener(&ipc_channel(channel), listener);
        Ok(())
    }

    /// Sends `(method, ...args)` on `ipcApp-notify`.
    pub fn notify_frontend(&self, method: &str, args: Vec<Value>) -> Result<(), IpcError> {
        let mut payload = Vec::with_capacity(args.len() + 1);
        payload.push(Value::String(method.to_string()));
        payload.extend(args);
        self.send(IpcAppChannel::AppNotify.as_str(), payload)
    }

    /// Instantiates `H` and serves it on its channel.
    pub fn register<H>(&self) -> Result<RemoveFunction, IpcError>
    where
        H: IpcHandler + Default,
    {
        self.register_handler(H::default())
    }

    pub fn register_handler<H>(&self, handler: H) -> Result<RemoveFunction, IpcError>
    where
        H: IpcHandler,
    {
        let socket = self.socket()?;
        let channel = ipc_channel(handler.channel_name());
        info!("Registering request handler on '{}'", channel);
        let responder = RequestDispatcher::new(handler).into_request_handler();
        Ok(socket.handle(&channel, responder))
    }

    pub fn register_notification<H>(&self) -> Result<RemoveFunction, IpcError>
    where
        H: NotificationHandler + Default,
    {
        self.register_notification_handler(H::default())
    }

    pub fn register_notification_handler<H>(&self, handler: H) -> Result<RemoveFunction, IpcError>
    where
        H: NotificationHandler,
    {
        let socket = self.socket()?;
        Ok(register_notification_handler(socket.as_ref(), handler))
    }

    /// Drops the transport. Registrations are left as they are.
    pub fn shutdown(&self) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .socket = None;
        info!("IPC host shut down");
    }

    #[track_caller]
    fn socket(&self) -> Result<Arc<dyn IpcSocketBackend>, IpcError> {
        let socket = self
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .socket
            .clone();
        socket.ok_or(IpcError::NotStarted {
            message: "IpcHost has no transport; call startup first".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

impl Debug for IpcHost {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter
            .debug_struct("IpcHost")
            .field("started", &self.is_valid())
            .finish()
    }
}
