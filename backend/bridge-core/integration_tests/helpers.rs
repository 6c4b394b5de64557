//! Test helpers for bridge integration tests.
//!
//! - Starting a host and an app over the loopback transport
//! - Recording fakes for the native capabilities
//! - Flushing in-flight notifications

use bridge_core::app::IpcApp;
use bridge_core::host::{
    IpcHost, IpcHostOptions, NativeDialog, TrayController, UpdateChecker, WindowController,
};
use bridge_core::loopback::{LoopbackBackend, LoopbackFrontend};

use models::ProcessVersions;
use models::dialog::{
    MessageBoxOptions, MessageBoxReturnValue, OpenDialogOptions, OpenDialogReturnValue,
    SaveDialogOptions, SaveDialogReturnValue,
};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

/// Both registries running over one loopback link.
pub struct Bridge {
    pub backend: LoopbackBackend,
    pub frontend: LoopbackFrontend,
    pub host: IpcHost,
    pub app: IpcApp,
}

/// Test helper: Start host and app with `ping` answering `{ "node": "20.0.0" }` and no native
/// capabilities.
pub fn start_bridge() -> Bridge {
    start_bridge_with(|options| options)
}

/// Test helper: Like [`start_bridge`], letting the test add capabilities.
pub fn start_bridge_with(configure: impl FnOnce(IpcHostOptions) -> IpcHostOptions) -> Bridge {
    let backend = LoopbackBackend::new();
    let frontend = backend.connect();

    let mut options = IpcHostOptions::new(Arc::new(backend.clone()));
    options.versions = node_versions();
    let host = IpcHost::new();
    host.startup(configure(options))
        .expect("Failed to start host");

    let app = IpcApp::new();
    app.startup(Arc::new(frontend.clone()))
        .expect("Failed to start app");

    Bridge {
        backend,
        frontend,
        host,
        app,
    }
}

pub fn node_versions() -> ProcessVersions {
    ProcessVersions::from_iter([("node", "20.0.0")])
}

/// Test helper: Round-trip a request so every notification sent before it, in either
/// direction, has been delivered.
pub async fn flush(app: &IpcApp) {
    app.host_functions()
        .ping()
        .await
        .expect("Flush ping failed");
}

#[derive(Debug, Default)]
pub struct CountingCapability {
    calls: AtomicUsize,
}

impl CountingCapability {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl WindowController for CountingCapability {
    fn show_and_focus(&self) {
        self.hit();
    }
}

impl TrayController for CountingCapability {
    fn enable_quit(&self) {
        self.hit();
    }
}

impl UpdateChecker for CountingCapability {
    fn check_for_updates(&self) {
        self.hit();
    }
}

/// Dialog that answers from fixed values and records every call.
#[derive(Debug, Default)]
pub struct ScriptedDialog {
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedDialog {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock").push(call);
    }
}

impl NativeDialog for ScriptedDialog {
    fn show_message_box(
        &self,
        options: MessageBoxOptions,
    ) -> BoxFuture<'static, MessageBoxReturnValue> {
        self.record(format!("showMessageBox:{}", options.message));
        let response = options.default_id.unwrap_or(0);
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
        self.record(format!("showOpenDialog:{}", options.title.unwrap_or_default()));
        async {
            OpenDialogReturnValue {
                canceled: false,
                file_paths: vec!["/tmp/picked.txt".to_string()],
            }
        }
        .boxed()
    }

    fn show_save_dialog(
        &self,
        options: SaveDialogOptions,
    ) -> BoxFuture<'static, SaveDialogReturnValue> {
        self.record(format!(
            "showSaveDialog:{}",
            options.default_path.unwrap_or_default()
        ));
        async {
            SaveDialogReturnValue {
                canceled: true,
                file_path: None,
            }
        }
        .boxed()
    }

    fn show_error_box(&self, title: String, content: String) {
        self.record(format!("showErrorBox:{title}:{content}"));
    }
}
