//! Stubs for the host's built-in request channels.

use crate::{ipc_function_proxy, ipc_proxy};

use models::dialog::{
    DialogMethod, MessageBoxOptions, MessageBoxReturnValue, OpenDialogOptions,
    OpenDialogReturnValue, SaveDialogOptions, SaveDialogReturnValue,
};
use models::{DIALOG_FUNCTION, IpcHostChannel, ProcessVersions};

ipc_proxy! {
    /// `ipc-host`.
    pub struct HostFunctionsProxy(channel = IpcHostChannel::Functions.as_str()) {
        /// Liveness probe; answers with the host's version map.
        fn ping() -> ProcessVersions = "ping";
    }
}

ipc_function_proxy! {
    /// `ipcHost-dialog`, every call routed through `callDialog`.
    pub struct DialogProxy(channel = IpcHostChannel::Dialog.as_str(), function = DIALOG_FUNCTION) {
        fn show_message_box(options: MessageBoxOptions) -> MessageBoxReturnValue
            = DialogMethod::ShowMessageBox.as_str();
        fn show_open_dialog(options: OpenDialogOptions) -> OpenDialogReturnValue
            = DialogMethod::ShowOpenDialog.as_str();
        fn show_save_dialog(options: SaveDialogOptions) -> SaveDialogReturnValue
            = DialogMethod::ShowSaveDialog.as_str();
        fn show_error_box(title: String, content: String) -> ()
            = DialogMethod::ShowErrorBox.as_str();
    }
}
