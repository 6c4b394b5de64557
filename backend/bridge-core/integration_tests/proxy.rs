use crate::helpers::{ScriptedDialog, start_bridge, start_bridge_with};

use bridge_core::error::ipc::IpcError;
use bridge_core::ipc_function_proxy;

use models::dialog::{MessageBoxOptions, OpenDialogOptions, SaveDialogOptions};
use models::{DIALOG_FUNCTION, IpcHostChannel};

use std::sync::Arc;

use serde_json::{Value, json};

ipc_function_proxy! {
    /// Dialog stub with a method the host does not know.
    struct RogueDialogProxy(channel = IpcHostChannel::Dialog.as_str(), function = DIALOG_FUNCTION) {
        fn show_certificate_trust_dialog(options: Value) -> Value = "showCertificateTrustDialog";
    }
}

/// **VALUE**: Verifies the dialog proxy forwards through `callDialog` to the capability.
///
/// **WHY THIS MATTERS**: The whole native dialog surface is one serving method. If the method
/// name were not passed as the first argument, every dialog call would hit the wrong branch.
#[tokio::test]
async fn given_dialog_capability_when_proxy_shows_message_box_then_capability_answers() {
    // GIVEN: Host with a scripted dialog
    let dialog = Arc::new(ScriptedDialog::default());
    let bridge = start_bridge_with(|options| options.with_dialog(dialog.clone()));

    // WHEN: Showing a message box with default button 2
    let reply = bridge
        .app
        .dialog()
        .show_message_box(MessageBoxOptions {
            message: "Save changes?".to_string(),
            default_id: Some(2),
            ..MessageBoxOptions::default()
        })
        .await
        .expect("dialog");

    // THEN: The capability ran and its answer came back typed
    assert_eq!(reply.response, 2);
    assert_eq!(dialog.calls(), vec!["showMessageBox:Save changes?".to_string()]);
}

#[tokio::test]
async fn given_dialog_capability_when_every_method_called_then_each_dispatched() {
    let dialog = Arc::new(ScriptedDialog::default());
    let bridge = start_bridge_with(|options| options.with_dialog(dialog.clone()));
    let proxy = bridge.app.dialog();

    let opened = proxy
        .show_open_dialog(OpenDialogOptions {
            title: Some("Pick".to_string()),
            ..OpenDialogOptions::default()
        })
        .await
        .expect("open");
    let saved = proxy
        .show_save_dialog(SaveDialogOptions {
            default_path: Some("/tmp/out.txt".to_string()),
            ..SaveDialogOptions::default()
        })
        .await
        .expect("save");
    proxy
        .show_error_box("Oops".to_string(), "Something broke".to_string())
        .await
        .expect("error box");

    assert_eq!(opened.file_paths, vec!["/tmp/picked.txt".to_string()]);
    assert!(saved.canceled);
    assert_eq!(
        dialog.calls(),
        vec![
            "showOpenDialog:Pick".to_string(),
            "showSaveDialog:/tmp/out.txt".to_string(),
            "showErrorBox:Oops:Something broke".to_string(),
        ]
    );
}

/// **VALUE**: Verifies unknown dialog methods are refused with "illegal dialog method".
///
/// **BUG THIS CATCHES**: Would catch the dialog handler forwarding arbitrary names to the
/// native layer instead of checking them against the known set.
#[tokio::test]
async fn given_unknown_dialog_method_when_called_then_illegal_dialog_method() {
    let dialog = Arc::new(ScriptedDialog::default());
    let bridge = start_bridge_with(|options| options.with_dialog(dialog.clone()));

    let error = RogueDialogProxy::new(&bridge.app)
        .show_certificate_trust_dialog(json!({}))
        .await
        .expect_err("must reject");

    let remote = error.remote().expect("remote failure");
    assert!(remote.message().contains("illegal dialog method 'showCertificateTrustDialog'"));
    assert_eq!(remote.name(), "DispatchError");
    assert!(dialog.calls().is_empty());
}

#[tokio::test]
async fn given_no_dialog_capability_when_called_then_unavailable() {
    let bridge = start_bridge();

    let error = bridge
        .app
        .dialog()
        .show_error_box("t".to_string(), "c".to_string())
        .await
        .expect_err("must reject");

    let remote = error.remote().expect("remote failure");
    assert_eq!(remote.name(), "IpcError");
    assert!(remote.message().contains("no native dialog available"));
}

#[tokio::test]
async fn given_function_proxy_when_called_then_method_is_first_forwarded_arg() {
    let bridge = start_bridge();
    let _token = bridge
        .host
        .handle("router", |_event, args| async move { json!({ "result": args }) })
        .expect("handle");

    let forwarded: Vec<Value> = bridge
        .app
        .function_proxy("router", "route")
        .call("target", vec![json!(1)])
        .await
        .expect("call");
    let direct: Vec<Value> = bridge
        .app
        .proxy("router")
        .call("target", vec![json!(1)])
        .await
        .expect("call");

    assert_eq!(forwarded, vec![json!("route"), json!("target"), json!(1)]);
    assert_eq!(direct, vec![json!("target"), json!(1)]);
}

#[tokio::test]
async fn given_missing_dialog_method_name_when_called_then_dispatch_error() {
    let dialog = Arc::new(ScriptedDialog::default());
    let bridge = start_bridge_with(|options| options.with_dialog(dialog.clone()));

    let error = bridge
        .app
        .call_ipc_channel(IpcHostChannel::Dialog.as_str(), DIALOG_FUNCTION, Vec::new())
        .await
        .expect_err("must reject");

    assert!(matches!(error, IpcError::Remote { .. }));
}
