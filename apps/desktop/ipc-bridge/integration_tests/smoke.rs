use ipc_bridge::capabilities::{HeadlessDialog, HeadlessShell};
use ipc_bridge::error::BridgeHostError;
use ipc_bridge::smoke;

use bridge_core::app::IpcApp;
use bridge_core::host::{IpcHost, IpcHostOptions, NativeDialog};
use bridge_core::loopback::loopback_pair;

use models::ProcessVersions;
use models::dialog::{
    MessageBoxOptions, MessageBoxReturnValue, OpenDialogOptions, OpenDialogReturnValue,
    SaveDialogOptions, SaveDialogReturnValue,
};

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, pending};

/// Dialog whose message box never closes.
struct StuckDialog;

impl NativeDialog for StuckDialog {
    fn show_message_box(&self, _: MessageBoxOptions) -> BoxFuture<'static, MessageBoxReturnValue> {
        pending().boxed()
    }

    fn show_open_dialog(&self, _: OpenDialogOptions) -> BoxFuture<'static, OpenDialogReturnValue> {
        pending().boxed()
    }

    fn show_save_dialog(&self, _: SaveDialogOptions) -> BoxFuture<'static, SaveDialogReturnValue> {
        pending().boxed()
    }

    fn show_error_box(&self, _: String, _: String) {}
}

fn start(dialog: Arc<dyn NativeDialog>, shell: Arc<HeadlessShell>) -> (IpcHost, IpcApp) {
    let (backend, frontend) = loopback_pair();
    let host = IpcHost::new();
    host.startup(
        IpcHostOptions::new(Arc::new(backend))
            .with_versions(ProcessVersions::from_iter([("bridge-test", "1")]))
            .with_dialog(dialog)
            .with_window_controller(shell.clone())
            .with_tray_controller(shell.clone())
            .with_update_checker(shell),
    )
    .expect("Failed to start host");
    let app = IpcApp::new();
    app.startup(Arc::new(frontend)).expect("Failed to start app");
    (host, app)
}

/// **VALUE**: Tests the full start-up exchange over the in-process transport.
///
/// **WHY THIS MATTERS**: This is what the binary runs on every start. It touches every
/// built-in channel in both directions.
///
/// **BUG THIS CATCHES**: Would catch a broken built-in registration, a notification that
/// never reaches its capability, or the app listener missing a host notification.
#[tokio::test]
async fn given_headless_host_when_smoke_run_then_every_leg_completes() {
    // GIVEN: Host with headless capabilities and a started app
    let shell = Arc::new(HeadlessShell::default());
    let (host, app) = start(Arc::new(HeadlessDialog), shell.clone());

    // WHEN: Running the exchange with a generous bound
    let report = smoke::run(&host, &app, Some(Duration::from_secs(5)))
        .await
        .expect("smoke exchange");

    // THEN: Every leg reported back
    assert_eq!(report.versions.get("bridge-test"), Some("1"));
    assert_eq!(report.message_box.response, 0);
    assert_eq!(report.app_notifications, 1);
    assert_eq!(shell.update_checks(), 1);
}

/// **VALUE**: Verifies the configured invoke timeout bounds a request that never answers.
#[tokio::test]
async fn given_stuck_dialog_when_smoke_run_with_timeout_then_timeout_error() {
    let (host, app) = start(Arc::new(StuckDialog), Arc::new(HeadlessShell::default()));

    let error = smoke::run(&host, &app, Some(Duration::from_millis(50)))
        .await
        .expect_err("must time out");

    match error {
        BridgeHostError::Timeout { message, .. } => {
            assert!(message.contains("showMessageBox"));
        }
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn given_app_not_started_when_smoke_run_then_ipc_error() {
    let (host, _app) = start(Arc::new(HeadlessDialog), Arc::new(HeadlessShell::default()));
    let idle = IpcApp::new();

    let error = smoke::run(&host, &idle, None)
        .await
        .expect_err("must fail");

    match error {
        BridgeHostError::Ipc { message, .. } => assert!(message.contains("Not Started Error")),
        other => panic!("expected Ipc, got {other:?}"),
    }
}
