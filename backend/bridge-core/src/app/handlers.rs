use crate::handler::{NotificationHandler, NotificationMethods, RestArgs};

use models::{AppNotification, IpcAppChannel};

use log::info;

/// Default `ipcApp-notify` handler: logs what the host sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct IpcAppNotifyHandler;

impl IpcAppNotifyHandler {
    fn notify_app(&self, RestArgs(args): RestArgs) {
        info!("App notified by host: {:?}", args);
    }
}

impl NotificationHandler for IpcAppNotifyHandler {
    fn channel_name(&self) -> &str {
        IpcAppChannel::AppNotify.as_str()
    }

    fn methods() -> NotificationMethods<Self> {
        NotificationMethods::new().method(AppNotification::NotifyApp.as_str(), Self::notify_app)
    }
}
