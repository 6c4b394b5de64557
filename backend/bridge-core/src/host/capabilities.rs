//! Native collaborators the host built-ins forward to.
//!
//! The bridge never owns a window, tray icon or updater. The embedding process supplies
//! whichever of these it has through [`IpcHostOptions`](crate::host::IpcHostOptions); a built-in
//! method whose capability is absent logs a warning (notifications) or fails (requests).

use models::dialog::{
    MessageBoxOptions, MessageBoxReturnValue, OpenDialogOptions, OpenDialogReturnValue,
    SaveDialogOptions, SaveDialogReturnValue,
};

use futures_util::future::BoxFuture;

pub trait WindowController: Send + Sync {
    /// Restores, shows and focuses the main window.
    fn show_and_focus(&self);
}

pub trait TrayController: Send + Sync {
    /// Lets the next close request quit the process instead of hiding to the tray.
    fn enable_quit(&self);
}

pub trait UpdateChecker: Send + Sync {
    fn check_for_updates(&self);
}

/// Modal dialogs served on the `ipcHost-dialog` channel.
pub trait NativeDialog: Send + Sync {
    fn show_message_box(
        &self,
        options: MessageBoxOptions,
    ) -> BoxFuture<'static, MessageBoxReturnValue>;

    fn show_open_dialog(
        &self,
        options: OpenDialogOptions,
    ) -> BoxFuture<'static, OpenDialogReturnValue>;

    fn show_save_dialog(
        &self,
        options: SaveDialogOptions,
    ) -> BoxFuture<'static, SaveDialogReturnValue>;

    /// Blocking error popup; returns once dismissed.
    fn show_error_box(&self, title: String, content: String);
}
