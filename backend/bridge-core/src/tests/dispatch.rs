use crate::error::dispatch::DispatchError;
use crate::handler::{
    IpcHandler, NotificationDispatcher, NotificationHandler, NotificationMethods,
    RequestDispatcher, RequestMethods,
};
use crate::marshal::RemoteError;
use crate::socket::IpcEvent;

use models::{IpcInvokeReturn, ipc_channel};

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use uuid::Uuid;

#[derive(Default)]
struct Calculator;

impl Calculator {
    async fn divide(self: Arc<Self>, (a, b): (f64, f64)) -> Result<f64, RemoteError> {
        if b == 0.0 {
            return Err(RemoteError::new("div by zero"));
        }
        Ok(a / b)
    }

    async fn explode(self: Arc<Self>, (): ()) -> Result<(), RemoteError> {
        panic!("calculator exploded");
    }
}

impl IpcHandler for Calculator {
    fn channel_name(&self) -> &str {
        "calc"
    }

    fn methods() -> RequestMethods<Self> {
        RequestMethods::new()
            .method("divide", Self::divide)
            .method("explode", Self::explode)
    }
}

#[derive(Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Recorder {
    fn record(&self, (value,): (Value,)) {
        self.calls
            .lock()
            .expect("lock")
            .push(("record".to_string(), value));
    }
}

impl NotificationHandler for Recorder {
    fn channel_name(&self) -> &str {
        "recorder"
    }

    fn methods() -> NotificationMethods<Self> {
        NotificationMethods::new().method("record", Self::record)
    }
}

fn event(channel: &str) -> IpcEvent {
    IpcEvent {
        channel: ipc_channel(channel),
        sender: Uuid::nil(),
    }
}

/// **VALUE**: Verifies the request path end to end without a transport.
///
/// **WHY THIS MATTERS**: This is the routing every request channel relies on: name lookup,
/// argument decoding, result serialization.
#[tokio::test]
async fn given_known_method_when_dispatched_then_result() {
    // GIVEN: A dispatcher for the calculator
    let dispatcher = RequestDispatcher::new(Calculator);

    // WHEN: Dispatching divide(4, 2)
    let reply = dispatcher
        .dispatch(event("calc"), vec![json!("divide"), json!(4), json!(2)])
        .await;

    // THEN: { result: 2 }
    assert_eq!(reply, IpcInvokeReturn::Result(json!(2.0)));
}

#[tokio::test]
async fn given_failing_method_when_dispatched_then_marshalled_error() {
    let dispatcher = RequestDispatcher::new(Calculator);

    let reply = dispatcher
        .dispatch(event("calc"), vec![json!("divide"), json!(4), json!(0)])
        .await;

    let error = reply.into_result().expect_err("must fail");
    assert_eq!(error.message, "div by zero");
    assert_eq!(error.name, "Error");
}

/// **VALUE**: Verifies an unknown method yields `{error}` instead of a dropped request.
///
/// **BUG THIS CATCHES**: Would catch a lookup miss that panics or never replies, which would
/// leave the caller waiting forever.
#[tokio::test]
async fn given_unknown_method_when_dispatched_then_error_names_method_and_channel() {
    let dispatcher = RequestDispatcher::new(Calculator);

    let reply = dispatcher
        .dispatch(event("calc"), vec![json!("multiply"), json!(1)])
        .await;

    let error = reply.into_result().expect_err("must fail");
    assert_eq!(error.name, "DispatchError");
    assert!(error.message.contains("unknown method 'multiply'"));
    assert!(error.message.contains("ipc.calc"));
}

#[tokio::test]
async fn given_missing_method_name_when_dispatched_then_error() {
    let dispatcher = RequestDispatcher::new(Calculator);

    let empty = dispatcher.dispatch(event("calc"), Vec::new()).await;
    let numeric = dispatcher.dispatch(event("calc"), vec![json!(7)]).await;

    assert!(empty.is_error());
    assert!(numeric.is_error());
}

#[tokio::test]
async fn given_bad_arguments_when_dispatched_then_error() {
    let dispatcher = RequestDispatcher::new(Calculator);

    let reply = dispatcher
        .dispatch(event("calc"), vec![json!("divide"), json!("four"), json!(2)])
        .await;

    let error = reply.into_result().expect_err("must fail");
    assert!(error.message.contains("argument 0"));
}

/// **VALUE**: Verifies a panicking method still produces a reply.
///
/// **WHY THIS MATTERS**: The responder runs on a transport task. An unwinding panic there
/// would drop the reply and hang the app side.
#[tokio::test]
async fn given_panicking_method_when_dispatched_then_panic_error() {
    let dispatcher = RequestDispatcher::new(Calculator);

    let reply = dispatcher
        .dispatch(event("calc"), vec![json!("explode")])
        .await;

    let error = reply.into_result().expect_err("must fail");
    assert_eq!(error.name, "Panic");
    assert_eq!(error.message, "calculator exploded");
}

#[test]
fn given_request_methods_when_built_then_table_lists_names() {
    let methods = Calculator::methods();

    assert!(methods.contains("divide"));
    assert!(!methods.contains("multiply"));
    assert_eq!(methods.len(), 2);
}

#[test]
fn given_known_notification_when_dispatched_then_method_runs() {
    let recorder = Recorder::default();
    let calls = Arc::clone(&recorder.calls);
    let dispatcher = NotificationDispatcher::new(recorder);

    dispatcher
        .dispatch(&event("recorder"), &[json!("record"), json!({ "n": 1 })])
        .expect("dispatch");

    assert_eq!(
        *calls.lock().expect("lock"),
        vec![("record".to_string(), json!({ "n": 1 }))]
    );
}

/// **VALUE**: Verifies the notification policy for unknown methods: a typed error, no call.
///
/// **BUG THIS CATCHES**: Would catch a fallback that runs some other method, or a panic that
/// takes down the delivery loop.
#[test]
fn given_unknown_notification_when_dispatched_then_unknown_method_error() {
    let recorder = Recorder::default();
    let calls = Arc::clone(&recorder.calls);
    let dispatcher = NotificationDispatcher::new(recorder);

    let result = dispatcher.dispatch(&event("recorder"), &[json!("erase")]);

    assert!(matches!(result, Err(DispatchError::UnknownMethod { .. })));
    assert!(calls.lock().expect("lock").is_empty());
}

#[test]
fn given_unknown_notification_when_delivered_through_listener_then_swallowed() {
    let recorder = Recorder::default();
    let calls = Arc::clone(&recorder.calls);
    let listener = NotificationDispatcher::new(recorder).into_listener();

    listener.call(&event("recorder"), &[json!("erase")]);
    listener.call(&event("recorder"), &[json!("record"), json!(2)]);

    assert_eq!(calls.lock().expect("lock").len(), 1);
}
