use crate::helpers::{CountingCapability, flush, node_versions, start_bridge, start_bridge_with};

use bridge_core::error::ipc::IpcError;
use bridge_core::handler::{
    IpcHandler, NotificationHandler, NotificationMethods, RequestMethods, RestArgs,
};
use bridge_core::host::{IpcHost, IpcHostOptions};
use bridge_core::loopback::LoopbackBackend;
use bridge_core::socket::IpcListener;

use models::{HostNotification, IpcHostChannel, ProcessVersions, ipc_channel};

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

#[derive(Default)]
struct Echo;

impl Echo {
    async fn echo(self: Arc<Self>, RestArgs(args): RestArgs) -> Result<Vec<Value>, Infallible> {
        Ok(args)
    }
}

impl IpcHandler for Echo {
    fn channel_name(&self) -> &str {
        "echo"
    }

    fn methods() -> RequestMethods<Self> {
        RequestMethods::new().method("echo", Self::echo)
    }
}

#[derive(Default)]
struct Quiet;

impl Quiet {
    fn hush(&self, (): ()) {}
}

impl NotificationHandler for Quiet {
    fn channel_name(&self) -> &str {
        "quiet"
    }

    fn methods() -> NotificationMethods<Self> {
        NotificationMethods::new().method("hush", Self::hush)
    }
}

/// **VALUE**: Verifies every registry operation refuses to run without a transport.
///
/// **BUG THIS CATCHES**: Would catch an operation silently doing nothing (or panicking) when
/// called before `startup` or after `shutdown`.
#[tokio::test]
async fn given_host_not_started_when_used_then_not_started_errors() {
    // GIVEN: A fresh host
    let host = IpcHost::new();

    // WHEN/THEN: Every operation fails with NotStarted
    assert!(!host.is_valid());
    assert!(matches!(
        host.send("x", Vec::new()),
        Err(IpcError::NotStarted { .. })
    ));
    assert!(matches!(
        host.notify_frontend("x", Vec::new()),
        Err(IpcError::NotStarted { .. })
    ));
    assert!(matches!(
        host.add_listener("x", IpcListener::new(|_, _| {})),
        Err(IpcError::NotStarted { .. })
    ));
    assert!(matches!(
        host.handle("x", |_event, _args| async { Value::Null }),
        Err(IpcError::NotStarted { .. })
    ));
}

#[tokio::test]
async fn given_started_host_when_shut_down_then_invalid() {
    let bridge = start_bridge();
    assert!(bridge.host.is_valid());

    bridge.host.shutdown();

    assert!(!bridge.host.is_valid());
    assert!(matches!(
        bridge.host.send("x", Vec::new()),
        Err(IpcError::NotStarted { .. })
    ));
}

/// **VALUE**: Verifies the built-in `ping` answers with the configured version map.
#[tokio::test]
async fn given_started_host_when_app_pings_then_version_map() {
    let bridge = start_bridge();

    let versions = bridge.app.host_functions().ping().await.expect("ping");

    assert_eq!(versions, node_versions());
}

#[tokio::test]
async fn given_default_options_when_pinged_then_reports_bridge_version() {
    let backend = LoopbackBackend::new();
    let frontend = backend.connect();
    let host = IpcHost::new();
    host.startup(
        IpcHostOptions::new(Arc::new(backend.clone()))
            .with_versions(ProcessVersions::from_iter([("shell", "1.2.3")])),
    )
    .expect("host");
    let app = bridge_core::app::IpcApp::new();
    app.startup(Arc::new(frontend)).expect("app");

    let versions = app.host_functions().ping().await.expect("ping");

    assert_eq!(versions.get("bridge"), Some(env!("CARGO_PKG_VERSION")));
    assert_eq!(versions.get("shell"), Some("1.2.3"));
    assert!(versions.get("os").is_some());
}

/// **VALUE**: Verifies a second `startup` swaps the transport and re-registers built-ins.
///
/// **WHY THIS MATTERS**: A host that reconnects (new window set, new transport) must keep
/// serving `ping` on the new link and must not leave duplicate built-in listeners behind.
#[tokio::test]
async fn given_second_startup_when_new_transport_then_builtins_move_over() {
    // GIVEN: A running bridge
    let bridge = start_bridge();

    // WHEN: Restarting the host on a new backend, same backend listeners checked
    let replacement = LoopbackBackend::new();
    let frontend = replacement.connect();
    bridge
        .host
        .startup(IpcHostOptions::new(Arc::new(replacement.clone())))
        .expect("restart");
    let app = bridge_core::app::IpcApp::new();
    app.startup(Arc::new(frontend)).expect("app");

    // THEN: Built-ins released on the old backend, served on the new one
    let notify = ipc_channel(IpcHostChannel::HostNotify.as_str());
    assert_eq!(bridge.backend.listener_count(&notify), 0);
    assert!(!bridge.backend.has_handler(&ipc_channel(IpcHostChannel::Functions.as_str())));
    assert_eq!(replacement.listener_count(&notify), 1);
    assert!(app.host_functions().ping().await.is_ok());
}

/// **VALUE**: Verifies host-notify methods reach their capabilities.
///
/// **BUG THIS CATCHES**: Would catch a method table entry wired to the wrong capability, or
/// the wire names drifting from the notification enum.
#[tokio::test]
async fn given_capabilities_when_app_notifies_host_then_each_called_once() {
    // GIVEN: Host with window, tray and updater
    let window = Arc::new(CountingCapability::default());
    let tray = Arc::new(CountingCapability::default());
    let updater = Arc::new(CountingCapability::default());
    let bridge = start_bridge_with(|options| {
        options
            .with_window_controller(window.clone())
            .with_tray_controller(tray.clone())
            .with_update_checker(updater.clone())
    });

    // WHEN: App sends each notification once
    for method in [
        HostNotification::ShowMainWindow,
        HostNotification::EnableQuit,
        HostNotification::CheckForUpdates,
        HostNotification::NotifyHost,
    ] {
        bridge
            .app
            .notify_host(method.as_str(), Vec::new())
            .expect("notify");
    }
    flush(&bridge.app).await;

    // THEN: Each capability saw exactly one call
    assert_eq!(window.calls(), 1);
    assert_eq!(tray.calls(), 1);
    assert_eq!(updater.calls(), 1);
}

/// **VALUE**: Verifies unknown notification methods and missing capabilities are logged, not
/// fatal.
///
/// **WHY THIS MATTERS**: Notification delivery runs on the transport's pump. If a bad message
/// killed it, every later notification and reply on the link would be lost.
#[tokio::test]
async fn given_bad_notifications_when_sent_then_link_keeps_working() {
    let bridge = start_bridge();

    bridge
        .app
        .notify_host("noSuchMethod", vec![json!(1)])
        .expect("notify");
    bridge
        .app
        .notify_host(HostNotification::ShowMainWindow.as_str(), Vec::new())
        .expect("notify");
    bridge
        .app
        .send(IpcHostChannel::HostNotify.as_str(), vec![json!(42)])
        .expect("send");

    assert!(bridge.app.host_functions().ping().await.is_ok());
}

#[tokio::test]
async fn given_host_listener_when_app_sends_then_receives_args_and_sender() {
    let bridge = start_bridge();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let listener = {
        let seen = Arc::clone(&seen);
        IpcListener::new(move |event, args| {
            seen.lock()
                .expect("lock")
                .push((event.sender, args.to_vec()));
        })
    };
    let token = bridge
        .host
        .add_listener("telemetry", listener)
        .expect("listen");

    bridge
        .app
        .send("telemetry", vec![json!("opened")])
        .expect("send");
    flush(&bridge.app).await;
    token.remove();
    bridge
        .app
        .send("telemetry", vec![json!("ignored")])
        .expect("send");
    flush(&bridge.app).await;

    let seen = seen.lock().expect("lock");
    assert_eq!(*seen, vec![(bridge.frontend.id(), vec![json!("opened")])]);
}

#[tokio::test]
async fn given_listener_when_removed_by_value_then_not_called() {
    let bridge = start_bridge();
    let calls = Arc::new(AtomicUsize::new(0));
    let listener = {
        let calls = Arc::clone(&calls);
        IpcListener::new(move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    };
    let _token = bridge
        .host
        .add_listener("metrics", listener.clone())
        .expect("listen");

    bridge
        .host
        .remove_listener("metrics", &listener)
        .expect("remove");
    bridge.app.send("metrics", Vec::new()).expect("send");
    flush(&bridge.app).await;

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// **VALUE**: Verifies handlers listed in the startup options follow the host to a new
/// transport.
///
/// **WHY THIS MATTERS**: An embedder declares its services once. If a restart only
/// re-registered the built-ins, every custom channel would go dark after the first reconnect.
///
/// **BUG THIS CATCHES**: Would catch option handlers registered once and never replayed, or
/// left serving on the replaced transport.
#[tokio::test]
async fn given_option_handlers_when_host_restarted_then_served_on_new_transport_only() {
    // GIVEN: A host started with an extra request and notification handler
    let first = LoopbackBackend::new();
    let options = |backend: &LoopbackBackend| {
        IpcHostOptions::new(Arc::new(backend.clone()))
            .with_handler::<Echo>()
            .with_notification_handler::<Quiet>()
    };
    let host = IpcHost::new();
    host.startup(options(&first)).expect("startup");
    assert!(first.has_handler(&ipc_channel("echo")));
    assert_eq!(first.listener_count(&ipc_channel("quiet")), 1);

    // WHEN: Restarting on another backend with the same options
    let second = LoopbackBackend::new();
    let frontend = second.connect();
    host.startup(options(&second)).expect("restart");
    let app = bridge_core::app::IpcApp::new();
    app.startup(Arc::new(frontend)).expect("app");

    // THEN: Released on the old backend, served on the new one
    assert!(!first.has_handler(&ipc_channel("echo")));
    assert_eq!(first.listener_count(&ipc_channel("quiet")), 0);
    assert_eq!(second.listener_count(&ipc_channel("quiet")), 1);
    let echoed: Vec<Value> = app
        .proxy("echo")
        .call("echo", vec![json!("a"), json!(2)])
        .await
        .expect("echo");
    assert_eq!(echoed, vec![json!("a"), json!(2)]);
}
