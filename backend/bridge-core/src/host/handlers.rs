//! Services every host registers at startup.

use crate::error::CoreError;
use crate::error::dispatch::DispatchError;
use crate::error::ipc::IpcError;
use crate::handler::{
    FromArgs, IpcHandler, NotificationHandler, NotificationMethods, RequestMethods, RestArgs,
};
use crate::host::capabilities::{NativeDialog, TrayController, UpdateChecker, WindowController};

use common::ErrorLocation;
use models::dialog::{DialogMethod, MessageBoxOptions, OpenDialogOptions, SaveDialogOptions};
use models::{DIALOG_FUNCTION, HostNotification, IpcHostChannel, ProcessVersions};

use std::convert::Infallible;
use std::panic::Location;
use std::sync::Arc;

use log::{info, warn};
use serde_json::Value;

/// `ipc-host`: liveness probe.
#[derive(Debug, Clone, Default)]
pub struct IpcHostHandler {
    versions: ProcessVersions,
}

impl IpcHostHandler {
    pub fn new(versions: ProcessVersions) -> Self {
        Self { versions }
    }

    async fn ping(self: Arc<Self>, (): ()) -> Result<ProcessVersions, Infallible> {
        Ok(self.versions.clone())
    }
}

impl IpcHandler for IpcHostHandler {
    fn channel_name(&self) -> &str {
        IpcHostChannel::Functions.as_str()
    }

    fn methods() -> RequestMethods<Self> {
        RequestMethods::new().method("ping", Self::ping)
    }
}

/// `ipcHost-dialog`: forwards `callDialog(method, ...args)` to the [`NativeDialog`] capability.
#[derive(Clone, Default)]
pub struct DialogHandler {
    dialog: Option<Arc<dyn NativeDialog>>,
}

impl DialogHandler {
    pub fn new(dialog: Option<Arc<dyn NativeDialog>>) -> Self {
        Self { dialog }
    }

    async fn call_dialog(self: Arc<Self>, args: RestArgs) -> Result<Value, CoreError> {
        let Some((method, rest)) = args.split_first() else {
            return Err(DispatchError::MissingMethodName {
                message: format!("{DIALOG_FUNCTION} expects a dialog method name"),
                location: ErrorLocation::from(Location::caller()),
            }
            .into());
        };
        let method = method.as_str().ok_or_else(|| DispatchError::MissingMethodName {
            message: format!("{DIALOG_FUNCTION} expects a dialog method name, got {method}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let method = DialogMethod::parse(method).map_err(|e| DispatchError::UnknownMethod {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let Some(dialog) = self.dialog.as_ref() else {
            return Err(IpcError::Unavailable {
                message: format!("no native dialog available for '{method}'"),
                location: ErrorLocation::from(Location::caller()),
            }
            .into());
        };

        let reply = match method {
            DialogMethod::ShowMessageBox => {
                let (options,) = <(MessageBoxOptions,)>::from_args(rest)?;
                serde_json::to_value(dialog.show_message_box(options).await)
            }
            DialogMethod::ShowOpenDialog => {
                let (options,) = <(Option<OpenDialogOptions>,)>::from_args(rest)?;
                serde_json::to_value(dialog.show_open_dialog(options.unwrap_or_default()).await)
            }
            DialogMethod::ShowSaveDialog => {
                let (options,) = <(Option<SaveDialogOptions>,)>::from_args(rest)?;
                serde_json::to_value(dialog.show_save_dialog(options.unwrap_or_default()).await)
            }
            DialogMethod::ShowErrorBox => {
                let (title, content) = <(String, String)>::from_args(rest)?;
                dialog.show_error_box(title, content);
                Ok(Value::Null)
            }
        };

        Ok(reply.map_err(IpcError::from)?)
    }
}

impl IpcHandler for DialogHandler {
    fn channel_name(&self) -> &str {
        IpcHostChannel::Dialog.as_str()
    }

    fn methods() -> RequestMethods<Self> {
        RequestMethods::new().method(DIALOG_FUNCTION, Self::call_dialog)
    }
}

/// `ipcHost-notify`: pokes from the app side.
#[derive(Clone, Default)]
pub struct IpcHostNotifyHandler {
    window: Option<Arc<dyn WindowController>>,
    tray: Option<Arc<dyn TrayController>>,
    updater: Option<Arc<dyn UpdateChecker>>,
}

impl IpcHostNotifyHandler {
    pub fn new(
        window: Option<Arc<dyn WindowController>>,
        tray: Option<Arc<dyn TrayController>>,
        updater: Option<Arc<dyn UpdateChecker>>,
    ) -> Self {
        Self {
            window,
            tray,
            updater,
        }
    }

    fn notify_host(&self, RestArgs(args): RestArgs) {
        info!("Host notified by app: {:?}", args);
    }

    fn show_main_window(&self, (): ()) {
        match &self.window {
            Some(window) => window.show_and_focus(),
            None => warn!("{} ignored: no window controller", HostNotification::ShowMainWindow),
        }
    }

    fn enable_quit(&self, (): ()) {
        match &self.tray {
            Some(tray) => tray.enable_quit(),
            None => warn!("{} ignored: no tray controller", HostNotification::EnableQuit),
        }
    }

    fn check_for_updates(&self, (): ()) {
        match &self.updater {
            Some(updater) => updater.check_for_updates(),
            None => warn!("{} ignored: no update checker", HostNotification::CheckForUpdates),
        }
    }
}

impl NotificationHandler for IpcHostNotifyHandler {
    fn channel_name(&self) -> &str {
        IpcHostChannel::HostNotify.as_str()
    }

    fn methods() -> NotificationMethods<Self> {
        NotificationMethods::new()
            .method(HostNotification::NotifyHost.as_str(), Self::notify_host)
            .method(HostNotification::ShowMainWindow.as_str(), Self::show_main_window)
            .method(HostNotification::EnableQuit.as_str(), Self::enable_quit)
            .method(HostNotification::CheckForUpdates.as_str(), Self::check_for_updates)
    }
}
