use crate::helpers::{flush, start_bridge};

use bridge_core::app::IpcApp;
use bridge_core::error::ipc::IpcError;
use bridge_core::handler::{
    IpcHandler, NotificationHandler, NotificationMethods, RequestMethods,
};
use bridge_core::host::IpcHost;
use bridge_core::ipc_proxy;
use bridge_core::loopback::LoopbackBackend;
use bridge_core::marshal::RemoteError;

use models::{IpcAppChannel, ProcessVersions, ipc_channel};

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

#[derive(Default)]
struct Calculator;

impl Calculator {
    async fn ping(self: Arc<Self>, (): ()) -> Result<ProcessVersions, RemoteError> {
        Ok(ProcessVersions::from_iter([("node", "20.0.0")]))
    }

    async fn divide(self: Arc<Self>, (a, b): (f64, f64)) -> Result<f64, RemoteError> {
        if b == 0.0 {
            return Err(RemoteError::new("div by zero"));
        }
        Ok(a / b)
    }

    async fn fail(self: Arc<Self>, (): ()) -> Result<(), RemoteError> {
        Err(RemoteError::new("boom"))
    }
}

impl IpcHandler for Calculator {
    fn channel_name(&self) -> &str {
        "calc"
    }

    fn methods() -> RequestMethods<Self> {
        RequestMethods::new()
            .method("ping", Self::ping)
            .method("divide", Self::divide)
            .method("fail", Self::fail)
    }
}

ipc_proxy! {
    struct CalculatorProxy(channel = "calc") {
        fn ping() -> ProcessVersions = "ping";
        fn divide(a: f64, b: f64) -> f64 = "divide";
    }
}

/// Records every call as `(method, args)`.
#[derive(Clone, Default)]
struct RecordingAppNotifications {
    calls: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
}

impl RecordingAppNotifications {
    fn x(&self, (a, b): (i64, i64)) {
        self.push("x", vec![json!(a), json!(b)]);
    }

    fn y(&self, (): ()) {
        self.push("y", Vec::new());
    }

    fn push(&self, method: &str, args: Vec<Value>) {
        self.calls
            .lock()
            .expect("lock")
            .push((method.to_string(), args));
    }
}

impl NotificationHandler for RecordingAppNotifications {
    fn channel_name(&self) -> &str {
        IpcAppChannel::AppNotify.as_str()
    }

    fn methods() -> NotificationMethods<Self> {
        NotificationMethods::new()
            .method("x", Self::x)
            .method("y", Self::y)
    }
}

/// **VALUE**: Scenario: a host handler exposing `ping() -> {node:"20.0.0"}` is reached through
/// a generated proxy.
///
/// **WHY THIS MATTERS**: This is the full round trip every feature uses: registration,
/// namespacing, dispatch, invoke-result wrapping, unwrapping and typed decoding.
#[tokio::test]
async fn given_registered_handler_when_proxy_pings_then_resolves_to_versions() {
    // GIVEN: Host serving the calculator
    let bridge = start_bridge();
    bridge
        .host
        .register::<Calculator>()
        .expect("Failed to register");

    // WHEN: App calls ping through the proxy
    let versions = CalculatorProxy::new(&bridge.app)
        .ping()
        .await
        .expect("ping failed");

    // THEN: Resolves to the handler's value
    assert_eq!(versions, ProcessVersions::from_iter([("node", "20.0.0")]));
    assert_eq!(
        serde_json::to_value(&versions).expect("serialize"),
        json!({ "node": "20.0.0" })
    );
}

/// **VALUE**: Scenario: `divide(4, 0)` fails on the host and the app sees `"div by zero"`.
///
/// **BUG THIS CATCHES**: Would catch handler failures being swallowed into a `null` result,
/// surfacing as transport errors, or losing their message on the way back.
#[tokio::test]
async fn given_throwing_handler_when_proxy_divides_by_zero_then_rejects_with_message() {
    // GIVEN: Host serving the calculator
    let bridge = start_bridge();
    bridge.host.register::<Calculator>().expect("register");

    // WHEN: Dividing by zero
    let error = CalculatorProxy::new(&bridge.app)
        .divide(4.0, 0.0)
        .await
        .expect_err("must reject");

    // THEN: A reconstructed remote failure with the original message
    let remote = error.remote().expect("remote failure");
    assert_eq!(remote.message(), "div by zero");
    assert!(matches!(error, IpcError::Remote { .. }));
}

#[tokio::test]
async fn given_throwing_method_when_called_by_name_then_message_is_boom() {
    let bridge = start_bridge();
    bridge.host.register::<Calculator>().expect("register");

    let error = bridge
        .app
        .call_ipc_channel("calc", "fail", Vec::new())
        .await
        .expect_err("must reject");

    assert_eq!(error.remote().map(RemoteError::message), Some("boom"));
}

/// **VALUE**: Scenario: invoking a channel nobody serves is a transport failure.
///
/// **WHY THIS MATTERS**: Callers distinguish "the service said no" (`Remote`) from "there is
/// no service" (`Transport`). Conflating them hides wiring bugs.
#[tokio::test]
async fn given_no_handler_when_app_invokes_missing_channel_then_transport_error() {
    // GIVEN: Nothing registered on "missing"
    let bridge = start_bridge();

    // WHEN: Invoking it
    let error = bridge
        .app
        .call_ipc_channel("missing", "anything", Vec::new())
        .await
        .expect_err("must reject");

    // THEN: Transport-level, naming the wire channel
    match error {
        IpcError::Transport { message, .. } => {
            assert!(message.contains("No handler registered for 'ipc.missing'"));
        }
        other => panic!("Expected transport error, got {other}"),
    }
}

/// **VALUE**: Registering twice leaves one active handler; calls reach the second.
///
/// **BUG THIS CATCHES**: Would catch a transport that keeps the first responder, or one that
/// lets the first registration's token remove the second's responder.
#[tokio::test]
async fn given_double_registration_when_called_then_routes_to_second() {
    // GIVEN: Two handlers registered on the same channel
    let bridge = start_bridge();
    let first = bridge
        .host
        .handle("dup", |_event, _args| async { json!({ "result": "first" }) })
        .expect("first");
    let _second = bridge
        .host
        .handle("dup", |_event, _args| async { json!({ "result": "second" }) })
        .expect("second");

    // WHEN: Calling, then releasing the superseded registration and calling again
    let before = bridge.app.call_ipc_channel("dup", "m", Vec::new()).await;
    first.remove();
    let after = bridge.app.call_ipc_channel("dup", "m", Vec::new()).await;

    // THEN: Both calls reach the second handler
    assert_eq!(before.expect("before"), json!("second"));
    assert_eq!(after.expect("after"), json!("second"));
    assert!(bridge.backend.has_handler(&ipc_channel("dup")));
}

/// **VALUE**: Verifies a registration token is idempotent.
///
/// **WHY THIS MATTERS**: Teardown code often releases the same token from more than one path
/// (window close and app quit). The second call must be harmless and the channel must stay
/// unserved.
///
/// **BUG THIS CATCHES**: Would catch a second `remove` panicking, or re-installing state the
/// first one cleared.
#[tokio::test]
async fn given_handler_token_when_called_twice_then_stays_removed() {
    // GIVEN: A registered request handler
    let bridge = start_bridge();
    let token = bridge.host.register::<Calculator>().expect("register");

    // WHEN: Releasing its token twice
    token.remove();
    token.remove();

    // THEN: The token reports removed and calls fail at the transport
    assert!(token.is_removed());
    let error = bridge
        .app
        .call_ipc_channel("calc", "divide", vec![json!(1), json!(1)])
        .await
        .expect_err("removed");
    assert!(matches!(error, IpcError::Transport { .. }));
}

/// **VALUE**: `notify_frontend("x", 1, 2)` reaches `x(1, 2)` exactly once on every app and
/// no other method.
///
/// **WHY THIS MATTERS**: Host notifications fan out to every window. A duplicate listener or
/// mis-routed name would trigger UI actions twice or on the wrong handler.
#[tokio::test]
async fn given_two_apps_when_host_notifies_frontend_then_each_runs_x_once() {
    // GIVEN: Two apps with recording notification handlers
    let backend = LoopbackBackend::new();
    let host = IpcHost::new();
    host.startup(bridge_core::host::IpcHostOptions::new(Arc::new(backend.clone())))
        .expect("host");

    let mut recorders = Vec::new();
    let mut apps = Vec::new();
    for _ in 0..2 {
        let recorder = RecordingAppNotifications::default();
        let app = IpcApp::new();
        app.startup_with_notifications(Arc::new(backend.connect()), recorder.clone())
            .expect("app");
        recorders.push(recorder);
        apps.push(app);
    }

    // WHEN: Host notifies x(1, 2)
    host.notify_frontend("x", vec![json!(1), json!(2)])
        .expect("notify");
    for app in &apps {
        flush(app).await;
    }

    // THEN: Each app recorded exactly one x(1, 2) and nothing else
    for recorder in &recorders {
        let calls = recorder.calls.lock().expect("lock").clone();
        assert_eq!(calls, vec![("x".to_string(), vec![json!(1), json!(2)])]);
    }
}

/// **VALUE**: Wire names are deterministic and agree with the compile-time constants.
#[test]
fn given_channel_when_mapped_repeatedly_then_wire_name_stable() {
    for channel in ["ipc-host", "calc", "", "a.b"] {
        assert_eq!(ipc_channel(channel), ipc_channel(channel));
        assert_eq!(ipc_channel(channel).logical(), channel);
    }
    assert_eq!(
        ipc_channel(IpcAppChannel::AppNotify.as_str()).as_str(),
        IpcAppChannel::AppNotify.wire_name()
    );
}
