use crate::capabilities::{HeadlessDialog, HeadlessShell};

use bridge_core::host::{NativeDialog, TrayController, UpdateChecker, WindowController};

use models::dialog::{MessageBoxOptions, OpenDialogOptions};

/// **VALUE**: Verifies the headless message box picks the default button.
///
/// **WHY THIS MATTERS**: Without a display nobody can click; the caller must still get an
/// answer that means "default choice" rather than an error or a hang.
#[tokio::test]
async fn given_default_button_when_message_box_shown_then_default_returned() {
    let dialog = HeadlessDialog;

    let with_default = dialog
        .show_message_box(MessageBoxOptions {
            message: "Continue?".to_string(),
            default_id: Some(1),
            ..MessageBoxOptions::default()
        })
        .await;
    let without_default = dialog.show_message_box(MessageBoxOptions::default()).await;

    assert_eq!(with_default.response, 1);
    assert_eq!(without_default.response, 0);
}

#[tokio::test]
async fn given_open_dialog_when_shown_then_canceled_without_paths() {
    let reply = HeadlessDialog
        .show_open_dialog(OpenDialogOptions::default())
        .await;

    assert!(reply.canceled);
    assert!(reply.file_paths.is_empty());
}

#[test]
fn given_shell_when_poked_then_counts_recorded() {
    let shell = HeadlessShell::default();
    assert!(!shell.quit_enabled());

    shell.show_and_focus();
    shell.show_and_focus();
    shell.check_for_updates();
    shell.enable_quit();

    assert_eq!(shell.window_requests(), 2);
    assert_eq!(shell.update_checks(), 1);
    assert!(shell.quit_enabled());
}
