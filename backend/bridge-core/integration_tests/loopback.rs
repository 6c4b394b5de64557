use crate::helpers::start_bridge;

use bridge_core::error::ipc::IpcError;
use bridge_core::loopback::{LoopbackBackend, loopback_pair};
use bridge_core::socket::{
    IpcEvent, IpcListener, IpcRequestHandler, IpcSocket, IpcSocketBackend, IpcSocketFrontend,
};

use models::ipc_channel;

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

fn echo_handler() -> IpcRequestHandler {
    Arc::new(|_event: IpcEvent, args: Vec<Value>| async move { Value::Array(args) }.boxed())
}

/// **VALUE**: Verifies a host message reaches every connected frontend.
///
/// **BUG THIS CATCHES**: Would catch `send` stopping at the first peer, or routing only to the
/// most recently connected one.
#[tokio::test]
async fn given_two_frontends_when_backend_sends_then_both_receive() {
    // GIVEN: Two frontends listening on the same channel
    let backend = LoopbackBackend::new();
    let first = backend.connect();
    let second = backend.connect();
    let channel = ipc_channel("broadcast");
    let (sender, mut received) = mpsc::unbounded_channel();
    for frontend in [&first, &second] {
        let sender = sender.clone();
        let id = frontend.id();
        let _token = frontend.add_listener(
            &channel,
            IpcListener::new(move |_event, args| {
                let _ = sender.send((id, args.to_vec()));
            }),
        );
    }

    // WHEN: The backend broadcasts
    backend.send(&channel, vec![json!("hello")]);

    // THEN: Each frontend saw it exactly once
    let mut seen = Vec::new();
    for _ in 0..2 {
        let (id, args) = timeout(WAIT, received.recv())
            .await
            .expect("timed out")
            .expect("closed");
        assert_eq!(args, vec![json!("hello")]);
        seen.push(id);
    }
    seen.sort();
    let mut expected = vec![first.id(), second.id()];
    expected.sort();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn given_frontend_message_when_received_then_sender_is_frontend_id() {
    let (backend, frontend) = loopback_pair();
    let channel = ipc_channel("upstream");
    let (sender, mut received) = mpsc::unbounded_channel();
    let _token = backend.add_listener(
        &channel,
        IpcListener::new(move |event, args| {
            let _ = sender.send((event.sender, event.channel.clone(), args.to_vec()));
        }),
    );

    frontend.send(&channel, vec![json!(1), json!(2)]);

    let (from, wire, args) = timeout(WAIT, received.recv())
        .await
        .expect("timed out")
        .expect("closed");
    assert_eq!(from, frontend.id());
    assert_eq!(wire, channel);
    assert_eq!(args, vec![json!(1), json!(2)]);
}

#[tokio::test]
async fn given_responder_when_invoked_then_reply_returned() {
    let (backend, frontend) = loopback_pair();
    let channel = ipc_channel("echo");
    let _token = backend.handle(&channel, echo_handler());

    let reply = frontend
        .invoke(&channel, vec![json!("a"), json!({"b": 1})])
        .await
        .expect("invoke");

    assert_eq!(reply, json!(["a", {"b": 1}]));
}

/// **VALUE**: Verifies an invoke with no responder fails instead of hanging.
#[tokio::test]
async fn given_no_responder_when_invoked_then_transport_error() {
    let (_backend, frontend) = loopback_pair();

    let error = timeout(WAIT, frontend.invoke(&ipc_channel("nobody"), Vec::new()))
        .await
        .expect("timed out")
        .expect_err("must fail");

    match error {
        IpcError::Transport { message, .. } => {
            assert!(message.contains("Error invoking remote method 'ipc.nobody'"));
            assert!(message.contains("No handler registered for 'ipc.nobody'"));
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

/// **VALUE**: Verifies a stale removal token cannot unregister a newer responder.
///
/// **BUG THIS CATCHES**: Would catch the first registration's token removing whatever now
/// serves the channel.
#[tokio::test]
async fn given_superseded_responder_when_old_token_removed_then_new_one_stays() {
    let (backend, frontend) = loopback_pair();
    let channel = ipc_channel("swap");
    let old = backend.handle(&channel, echo_handler());
    let new = backend.handle(
        &channel,
        Arc::new(|_event: IpcEvent, _args: Vec<Value>| async { json!("second") }.boxed()),
    );

    old.remove();

    assert!(backend.has_handler(&channel));
    let reply = frontend.invoke(&channel, Vec::new()).await.expect("invoke");
    assert_eq!(reply, json!("second"));

    new.remove();
    assert!(!backend.has_handler(&channel));
}

/// **VALUE**: Verifies dropping the links fails in-flight and later invokes.
///
/// **WHY THIS MATTERS**: A caller awaiting a reply from a host that went away must get an
/// error; otherwise it waits forever.
#[tokio::test]
async fn given_pending_invoke_when_backend_disconnects_then_invoke_fails() {
    // GIVEN: A responder that never answers, with a request already inside it
    let (backend, frontend) = loopback_pair();
    let channel = ipc_channel("slow");
    let (started, mut started_rx) = mpsc::unbounded_channel();
    let _token = backend.handle(
        &channel,
        Arc::new(move |_event: IpcEvent, _args: Vec<Value>| {
            let _ = started.send(());
            futures_util::future::pending::<Value>().boxed()
        }),
    );
    let in_flight = tokio::spawn({
        let frontend = frontend.clone();
        let channel = channel.clone();
        async move { frontend.invoke(&channel, Vec::new()).await }
    });
    timeout(WAIT, started_rx.recv())
        .await
        .expect("timed out")
        .expect("closed");

    // WHEN: The backend drops every link
    backend.disconnect_all();

    // THEN: The pending invoke fails, and so does the next one
    let error = timeout(WAIT, in_flight)
        .await
        .expect("timed out")
        .expect("join")
        .expect_err("must fail");
    assert!(matches!(error, IpcError::Transport { .. }));
    assert!(!frontend.is_connected());
    assert_eq!(backend.peer_count(), 0);

    let error = frontend
        .invoke(&channel, Vec::new())
        .await
        .expect_err("must fail");
    assert!(error.to_string().contains("connection closed"));
}

#[tokio::test]
async fn given_once_listener_when_two_messages_then_called_once() {
    let (backend, frontend) = loopback_pair();
    let channel = ipc_channel("once");
    let (sender, mut received) = mpsc::unbounded_channel();
    frontend.once(
        &channel,
        IpcListener::new(move |_event, args| {
            let _ = sender.send(args.to_vec());
        }),
    );
    assert_eq!(frontend.listener_count(&channel), 1);

    backend.send(&channel, vec![json!(1)]);
    backend.send(&channel, vec![json!(2)]);

    let first = timeout(WAIT, received.recv())
        .await
        .expect("timed out")
        .expect("closed");
    assert_eq!(first, vec![json!(1)]);
    // Round trip so the second message has been processed.
    let _token = backend.handle(&ipc_channel("sync"), echo_handler());
    frontend
        .invoke(&ipc_channel("sync"), Vec::new())
        .await
        .expect("invoke");
    assert!(received.try_recv().is_err());
    assert_eq!(frontend.listener_count(&channel), 0);
}

fn explode() -> Value {
    panic!("responder blew up")
}

/// **VALUE**: Verifies a responder that panics still answers the caller.
///
/// **WHY THIS MATTERS**: The request path must always settle. A reply that never comes would
/// leave the app awaiting forever with no error to show.
///
/// **BUG THIS CATCHES**: Would catch the serving task dying with the panic and never sending a
/// reply frame.
#[tokio::test]
async fn given_panicking_responder_when_invoked_then_transport_error_not_hang() {
    // GIVEN: A raw responder that panics inside its future
    let bridge = start_bridge();
    let _token = bridge
        .host
        .handle("boom", |_event, _args| async move { explode() })
        .expect("handle");

    // WHEN: Invoking it
    let outcome = timeout(WAIT, bridge.app.invoke("boom", Vec::new()))
        .await
        .expect("invoke must settle");

    // THEN: A transport error carrying the panic message
    match outcome {
        Err(IpcError::Transport { message, .. }) => {
            assert!(message.contains("responder panicked: responder blew up"));
        }
        other => panic!("expected Transport, got {other:?}"),
    }

    // AND: The link keeps serving
    assert!(bridge.app.host_functions().ping().await.is_ok());
}

#[tokio::test]
async fn given_responder_panicking_before_future_when_invoked_then_transport_error() {
    let (backend, frontend) = loopback_pair();
    let channel = ipc_channel("eager");
    let _token = backend.handle(
        &channel,
        Arc::new(
            |_event: IpcEvent, _args: Vec<Value>| -> BoxFuture<'static, Value> {
                panic!("no future for you")
            },
        ),
    );

    let error = timeout(WAIT, frontend.invoke(&channel, Vec::new()))
        .await
        .expect("invoke must settle")
        .expect_err("must fail");

    assert!(error.to_string().contains("no future for you"));
}

/// **VALUE**: Verifies an abandoned invoke does not leave its waiter behind.
///
/// **BUG THIS CATCHES**: Would catch callers that give up (timeouts) growing the pending map
/// without bound when the responder never answers.
#[tokio::test]
async fn given_invoke_abandoned_by_timeout_when_dropped_then_no_pending_left() {
    // GIVEN: A responder that never answers
    let (backend, frontend) = loopback_pair();
    let channel = ipc_channel("silent");
    let _token = backend.handle(
        &channel,
        Arc::new(|_event: IpcEvent, _args: Vec<Value>| {
            futures_util::future::pending::<Value>().boxed()
        }),
    );

    // WHEN: Callers give up after a short bound
    for _ in 0..3 {
        let outcome = timeout(
            Duration::from_millis(20),
            frontend.invoke(&channel, Vec::new()),
        )
        .await;
        assert!(outcome.is_err(), "responder never answers");
    }

    // THEN: Nothing is left waiting
    assert_eq!(frontend.pending_count(), 0);
}
