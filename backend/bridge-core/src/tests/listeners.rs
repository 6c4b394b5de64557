use crate::loopback::listeners::ListenerTable;
use crate::socket::{IpcEvent, IpcListener};

use models::ipc_channel;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use uuid::Uuid;

fn counting_listener(counter: &Arc<AtomicUsize>) -> IpcListener {
    let counter = Arc::clone(counter);
    IpcListener::new(move |_event, _args| {
        counter.fetch_add(1, Ordering::SeqCst);
    })
}

fn event(channel: &str) -> IpcEvent {
    IpcEvent {
        channel: ipc_channel(channel),
        sender: Uuid::nil(),
    }
}

/// **VALUE**: Verifies `once` listeners fire a single time while regular listeners stay.
///
/// **BUG THIS CATCHES**: Would catch once-entries surviving the first emit, or the retain
/// dropping regular listeners along with them.
#[test]
fn given_once_and_regular_listeners_when_emitted_twice_then_once_fires_once() {
    // GIVEN: One once-listener and one regular listener on the same channel
    let table = ListenerTable::default();
    let once_calls = Arc::new(AtomicUsize::new(0));
    let regular_calls = Arc::new(AtomicUsize::new(0));
    let channel = ipc_channel("jobs");
    table.add(&channel, counting_listener(&once_calls), true);
    table.add(&channel, counting_listener(&regular_calls), false);

    // WHEN: Emitting twice
    let first = table.emit(&event("jobs"), &[]);
    let second = table.emit(&event("jobs"), &[]);

    // THEN: once-listener ran once, regular listener twice
    assert_eq!((first, second), (2, 1));
    assert_eq!(once_calls.load(Ordering::SeqCst), 1);
    assert_eq!(regular_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn given_listeners_when_emitted_then_called_in_registration_order_with_args() {
    let table = ListenerTable::default();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let channel = ipc_channel("ordered");
    for tag in ["a", "b", "c"] {
        let seen = Arc::clone(&seen);
        table.add(
            &channel,
            IpcListener::new(move |_event, args: &[Value]| {
                seen.lock().expect("lock").push((tag, args.to_vec()));
            }),
            false,
        );
    }

    table.emit(&event("ordered"), &[json!(1)]);

    let seen = seen.lock().expect("lock");
    let tags: Vec<&str> = seen.iter().map(|(tag, _)| *tag).collect();
    assert_eq!(tags, vec!["a", "b", "c"]);
    assert!(seen.iter().all(|(_, args)| args == &vec![json!(1)]));
}

#[test]
fn given_token_when_removed_twice_then_second_call_is_noop() {
    let table = Arc::new(ListenerTable::default());
    let calls = Arc::new(AtomicUsize::new(0));
    let channel = ipc_channel("tokens");
    let token = table.add_with_token(&channel, counting_listener(&calls));

    token.remove();
    token.remove();

    assert!(token.is_removed());
    assert_eq!(table.count(&channel), 0);
    assert_eq!(table.emit(&event("tokens"), &[]), 0);
}

#[test]
fn given_other_channel_when_emitted_then_listener_not_called() {
    let table = ListenerTable::default();
    let calls = Arc::new(AtomicUsize::new(0));
    table.add(&ipc_channel("a"), counting_listener(&calls), false);

    table.emit(&event("b"), &[]);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

/// **VALUE**: Verifies a listener can unregister itself while being called.
///
/// **WHY THIS MATTERS**: Listeners run on the delivery path. Calling them under the table
/// lock would deadlock the first time one removes itself.
#[test]
fn given_listener_removing_itself_when_emitted_then_no_deadlock() {
    let table = Arc::new(ListenerTable::default());
    let channel = ipc_channel("self-removing");
    let slot: Arc<Mutex<Option<IpcListener>>> = Arc::new(Mutex::new(None));

    let listener = {
        let table = Arc::clone(&table);
        let slot = Arc::clone(&slot);
        let channel = channel.clone();
        IpcListener::new(move |_event, _args| {
            if let Some(me) = slot.lock().expect("lock").take() {
                table.remove(&channel, &me);
            }
        })
    };
    *slot.lock().expect("lock") = Some(listener.clone());
    table.add(&channel, listener, false);

    assert_eq!(table.emit(&event("self-removing"), &[]), 1);
    assert_eq!(table.count(&channel), 0);
}
