//! Native collaborators for a process without a display.
//!
//! Every request is logged. Dialogs answer as if the user took the default choice.

use bridge_core::host::{NativeDialog, TrayController, UpdateChecker, WindowController};

use models::dialog::{
    MessageBoxOptions, MessageBoxReturnValue, OpenDialogOptions, OpenDialogReturnValue,
    SaveDialogOptions, SaveDialogReturnValue,
};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use log::{error, info};

/// Window, tray and updater in one; records what was asked of it.
#[derive(Debug, Default)]
pub struct HeadlessShell {
    window_requests: AtomicUsize,
    update_checks: AtomicUsize,
    quit_enabled: AtomicBool,
}

impl HeadlessShell {
    pub fn window_requests(&self) -> usize {
        self.window_requests.load(Ordering::SeqCst)
    }

    pub fn update_checks(&self) -> usize {
        self.update_checks.load(Ordering::SeqCst)
    }

    pub fn quit_enabled(&self) -> bool {
        self.quit_enabled.load(Ordering::SeqCst)
    }
}

impl WindowController for HeadlessShell {
    fn show_and_focus(&self) {
        self.window_requests.fetch_add(1, Ordering::SeqCst);
        info!("Main window requested (headless, nothing shown)");
    }
}

impl TrayController for HeadlessShell {
    fn enable_quit(&self) {
        self.quit_enabled.store(true, Ordering::SeqCst);
        info!("Quit enabled");
    }
}

impl UpdateChecker for HeadlessShell {
    fn check_for_updates(&self) {
        self.update_checks.fetch_add(1, Ordering::SeqCst);
        info!("Update check requested; no update source configured");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessDialog;

impl NativeDialog for HeadlessDialog {
    fn show_message_box(
        &self,
        options: MessageBoxOptions,
    ) -> BoxFuture<'static, MessageBoxReturnValue> {
        let response = options.default_id.unwrap_or(0);
        info!(
            "Message box '{}' answered with button {}",
            options.message, response
        );
        async move {
            MessageBoxReturnValue {
                response,
                checkbox_checked: false,
            }
        }
        .boxed()
    }

    fn show_open_dialog(
        &self,
        options: OpenDialogOptions,
    ) -> BoxFuture<'static, OpenDialogReturnValue> {
        info!("Open dialog {:?} canceled", options.title);
        async {
            OpenDialogReturnValue {
                canceled: true,
                file_paths: Vec::new(),
            }
        }
        .boxed()
    }

    fn show_save_dialog(
        &self,
        options: SaveDialogOptions,
    ) -> BoxFuture<'static, SaveDialogReturnValue> {
        info!("Save dialog {:?} canceled", options.title);
        async {
            SaveDialogReturnValue {
                canceled: true,
                file_path: None,
            }
        }
        .boxed()
    }

    fn show_error_box(&self, title: String, content: String) {
        error!("{title}: {content}");
    }
}
