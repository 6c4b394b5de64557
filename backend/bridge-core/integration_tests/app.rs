use crate::helpers::{flush, start_bridge};

use bridge_core::app::IpcApp;
use bridge_core::error::ipc::IpcError;
use bridge_core::socket::IpcListener;

use models::AppNotification;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

/// **VALUE**: Verifies the app registry refuses to run without a transport.
#[tokio::test]
async fn given_app_not_started_when_used_then_not_started_errors() {
    let app = IpcApp::new();

    assert!(!app.is_valid());
    assert!(matches!(
        app.invoke("x", Vec::new()).await,
        Err(IpcError::NotStarted { .. })
    ));
    assert!(matches!(
        app.call_ipc_channel("x", "m", Vec::new()).await,
        Err(IpcError::NotStarted { .. })
    ));
    assert!(matches!(
        app.notify_host("m", Vec::new()),
        Err(IpcError::NotStarted { .. })
    ));
    assert!(matches!(
        app.host_functions().ping().await,
        Err(IpcError::NotStarted { .. })
    ));
}

#[tokio::test]
async fn given_started_app_when_shut_down_then_invalid() {
    let bridge = start_bridge();

    bridge.app.shutdown();

    assert!(!bridge.app.is_valid());
    assert!(matches!(
        bridge.app.send("x", Vec::new()),
        Err(IpcError::NotStarted { .. })
    ));
}

/// **VALUE**: Verifies `invoke` returns the raw reply without unwrapping it.
///
/// **WHY THIS MATTERS**: `invoke` is the primitive under `call_ipc_channel`. If it already
/// unwrapped invoke results, custom responders speaking another shape would break.
#[tokio::test]
async fn given_raw_responder_when_invoked_then_reply_untouched() {
    let bridge = start_bridge();
    let _token = bridge
        .host
        .handle("raw", |_event, args| async move { json!({ "echo": args }) })
        .expect("handle");

    let reply = bridge
        .app
        .invoke("raw", vec![json!(1), json!("two")])
        .await
        .expect("invoke");

    assert_eq!(reply, json!({ "echo": [1, "two"] }));
}

/// **VALUE**: Verifies a reply that is not an invoke result becomes a protocol error.
///
/// **BUG THIS CATCHES**: Would catch an ambiguous `{result, error}` reply being accepted, or
/// a bare value being treated as a result.
#[tokio::test]
async fn given_malformed_reply_when_called_then_protocol_error() {
    let bridge = start_bridge();
    let _bare = bridge
        .host
        .handle("bare", |_event, _args| async { json!(42) })
        .expect("handle");
    let _both = bridge
        .host
        .handle("both", |_event, _args| async {
            json!({ "result": 1, "error": { "name": "E", "message": "m" } })
        })
        .expect("handle");

    let bare = bridge.app.call_ipc_channel("bare", "m", Vec::new()).await;
    let both = bridge.app.call_ipc_channel("both", "m", Vec::new()).await;

    assert!(matches!(bare, Err(IpcError::Protocol { .. })));
    assert!(matches!(both, Err(IpcError::Protocol { .. })));
}

/// **VALUE**: Verifies the method name travels as the first payload element.
#[tokio::test]
async fn given_call_when_received_by_responder_then_method_first() {
    let bridge = start_bridge();
    let _token = bridge
        .host
        .handle("shape", |_event, args| async move { json!({ "result": args }) })
        .expect("handle");

    let payload = bridge
        .app
        .call_ipc_channel("shape", "doThing", vec![json!(1), json!(2)])
        .await
        .expect("call");

    assert_eq!(payload, json!(["doThing", 1, 2]));
}

#[derive(Debug, Deserialize, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

#[tokio::test]
async fn given_typed_call_when_result_matches_then_decoded() {
    let bridge = start_bridge();
    let _token = bridge
        .host
        .handle("geo", |_event, _args| async {
            json!({ "result": { "x": 3, "y": 4 } })
        })
        .expect("handle");

    let point: Point = bridge
        .app
        .call_ipc_channel_as("geo", "origin", Vec::new())
        .await
        .expect("call");
    let wrong: Result<Vec<String>, _> = bridge
        .app
        .call_ipc_channel_as("geo", "origin", Vec::new())
        .await;

    assert_eq!(point, Point { x: 3, y: 4 });
    assert!(matches!(wrong, Err(IpcError::Serialization { .. })));
}

/// **VALUE**: Verifies the default `ipcApp-notify` handler accepts `notifyApp` and ignores
/// garbage without breaking the link.
#[tokio::test]
async fn given_default_app_handler_when_host_notifies_then_link_survives() {
    let bridge = start_bridge();

    bridge
        .host
        .notify_frontend(AppNotification::NotifyApp.as_str(), vec![json!("hello")])
        .expect("notify");
    bridge
        .host
        .notify_frontend("unknown", Vec::new())
        .expect("notify");

    assert!(bridge.app.host_functions().ping().await.is_ok());
}

#[tokio::test]
async fn given_once_listener_when_host_sends_twice_then_called_once() {
    let bridge = start_bridge();
    let calls = Arc::new(AtomicUsize::new(0));
    let listener = {
        let calls = Arc::clone(&calls);
        IpcListener::new(move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    };
    bridge.app.once("tick", listener).expect("once");

    bridge.host.send("tick", Vec::new()).expect("send");
    bridge.host.send("tick", Vec::new()).expect("send");
    flush(&bridge.app).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
