//! Method names understood by the built-in notification channels.

use std::fmt::{Display, Formatter, Result as FormatResult};

/// Methods of the host-notify channel (app → host).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostNotification {
    /// Plain liveness poke; the host only logs it.
    NotifyHost,
    /// Ask the host to show and focus its main window.
    ShowMainWindow,
    /// Allow the application to quit instead of hiding to the tray.
    EnableQuit,
    /// Ask the host to poll for updates now.
    CheckForUpdates,
}

impl HostNotification {
    pub const fn as_str(self) -> &'static str {
        match self {
            HostNotification::NotifyHost => "notifyHost",
            HostNotification::ShowMainWindow => "showMainWindow",
            HostNotification::EnableQuit => "enableQuit",
            HostNotification::CheckForUpdates => "checkForUpdates",
        }
    }
}

impl AsRef<str> for HostNotification {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for HostNotification {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

/// Methods of the app-notify channel (host → app).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppNotification {
    NotifyApp,
}

impl AppNotification {
    pub const fn as_str(self) -> &'static str {
        match self {
            AppNotification::NotifyApp => "notifyApp",
        }
    }
}

impl AsRef<str> for AppNotification {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for AppNotification {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}
