use crate::socket::{IpcEvent, IpcListener, RemoveFunction};

use models::WireChannel;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

struct Entry {
    listener: IpcListener,
    once: bool,
}

/// Per-channel listener lists of one loopback end.
#[derive(Default)]
pub(crate) struct ListenerTable {
    entries: Mutex<HashMap<WireChannel, Vec<Entry>>>,
}

impl ListenerTable {
    pub(crate) fn add(&self, channel: &WireChannel, listener: IpcListener, once: bool) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(channel.clone())
            .or_default()
            .push(Entry { listener, once });
    }

    /// [`add`](ListenerTable::add) returning a token that removes this registration.
    pub(crate) fn add_with_token(
        self: &Arc<Self>,
        channel: &WireChannel,
        listener: IpcListener,
    ) -> RemoveFunction {
        self.add(channel, listener.clone(), false);
        let table = Arc::downgrade(self);
        let channel = channel.clone();
        RemoveFunction::new(move || {
            if let Some(table) = table.upgrade() {
                table.remove(&channel, &listener);
            }
        })
    }

    /// Removes the first registration of `listener` on `channel`.
    pub(crate) fn remove(&self, channel: &WireChannel, listener: &IpcListener) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(list) = entries.get_mut(channel) else {
            return false;
        };
        let Some(position) = list.iter().position(|entry| entry.listener == *listener) else {
            return false;
        };
        list.remove(position);
        if list.is_empty() {
            entries.remove(channel);
        }
        true
    }

    /// Calls every listener on the event's channel in registration order and returns how many
    /// were called. Listeners run outside the lock, so they may add or remove listeners.
    pub(crate) fn emit(&self, event: &IpcEvent, args: &[Value]) -> usize {
        let targets: Vec<IpcListener> = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            let Some(list) = entries.get_mut(&event.channel) else {
                return 0;
            };
            let targets = list.iter().map(|entry| entry.listener.clone()).collect();
            list.retain(|entry| !entry.once);
            if list.is_empty() {
                entries.remove(&event.channel);
            }
            targets
        };

        for listener in &targets {
            listener.call(event, args);
        }
        targets.len()
    }

    pub(crate) fn count(&self, channel: &WireChannel) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel)
            .map_or(0, Vec::len)
    }
}
