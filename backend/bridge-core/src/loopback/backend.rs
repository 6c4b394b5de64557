use crate::loopback::frame::{Frame, ReplyOutcome};
use crate::loopback::frontend::LoopbackFrontend;
use crate::loopback::listeners::ListenerTable;
use crate::socket::{
    IpcEvent, IpcListener, IpcRequestHandler, IpcSocket, IpcSocketBackend, RemoveFunction,
};

use models::WireChannel;

use std::any::Any;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FormatResult};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use futures_util::FutureExt;
use log::{debug, error, warn};
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

struct HandlerSlot {
    id: Uuid,
    handler: IpcRequestHandler,
}

pub(crate) struct BackendInner {
    id: Uuid,
    listeners: Arc<ListenerTable>,
    handlers: Mutex<HashMap<WireChannel, HandlerSlot>>,
    peers: Mutex<HashMap<Uuid, mpsc::UnboundedSender<String>>>,
    inbound: mpsc::UnboundedSender<(Uuid, String)>,
}

/// Host end of the in-process transport.
///
/// Frames from every connected [`LoopbackFrontend`] are handled by one pump task, so
/// notifications reach listeners in arrival order. Each `invoke` is served on its own task.
#[derive(Clone)]
pub struct LoopbackBackend {
    inner: Arc<BackendInner>,
}

impl LoopbackBackend {
    /// Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (inbound, receiver) = mpsc::unbounded_channel();
        let inner = Arc::new(BackendInner {
            id: Uuid::new_v4(),
            listeners: Arc::new(ListenerTable::default()),
            handlers: Mutex::new(HashMap::new()),
            peers: Mutex::new(HashMap::new()),
            inbound,
        });
        tokio::spawn(pump(Arc::downgrade(&inner), receiver));
        Self { inner }
    }

    /// Opens a new app-side end.
    pub fn connect(&self) -> LoopbackFrontend {
        let peer = Uuid::new_v4();
        let (outbound, receiver) = mpsc::unbounded_channel();
        self.inner
            .peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(peer, outbound);
        debug!("Loopback peer {} connected", peer);
        LoopbackFrontend::new(peer, self.inner.id, self.inner.inbound.clone(), receiver)
    }

    /// Drops every frontend link. Their pending and future invokes fail.
    pub fn disconnect_all(&self) {
        let mut peers = self
            .inner
            .peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        debug!("Disconnecting {} loopback peer(s)", peers.len());
        peers.clear();
    }

    pub fn peer_count(&self) -> usize {
        self.inner
            .peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn listener_count(&self, channel: &WireChannel) -> usize {
        self.inner.listeners.count(channel)
    }

    pub fn has_handler(&self, channel: &WireChannel) -> bool {
        self.inner
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(channel)
    }
}

impl Default for LoopbackBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for LoopbackBackend {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter
            .debug_struct("LoopbackBackend")
            .field("id", &self.inner.id)
            .field("peers", &self.peer_count())
            .finish()
    }
}

impl IpcSocket for LoopbackBackend {
    fn send(&self, channel: &WireChannel, args: Vec<Value>) {
        let frame = Frame::Message {
            channel: channel.to_string(),
            args,
        };
        let raw = match frame.encode() {
            Ok(raw) => raw,
            Err(e) => {
                error!("Dropping message on '{}': {}", channel, e);
                return;
            }
        };

        // Peers whose frontend is gone are pruned here.
        self.inner
            .peers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, peer| peer.send(raw.clone()).is_ok());
    }

    fn add_listener(&self, channel: &WireChannel, listener: IpcListener) -> RemoveFunction {
        self.inner.listeners.add_with_token(channel, listener)
    }

    fn once(&self, channel: &WireChannel, listener: IpcListener) {
        self.inner.listeners.add(channel, listener, true);
    }

    fn remove_listener(&self, channel: &WireChannel, listener: &IpcListener) {
        self.inner.listeners.remove(channel, listener);
    }
}

impl IpcSocketBackend for LoopbackBackend {
    fn handle(&self, channel: &WireChannel, handler: IpcRequestHandler) -> RemoveFunction {
        let id = Uuid::new_v4();
        let previous = self
            .inner
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(channel.clone(), HandlerSlot { id, handler });
        if previous.is_some() {
            debug!("Superseded responder on '{}'", channel);
        }

        let inner = Arc::downgrade(&self.inner);
        let channel = channel.clone();
        RemoveFunction::new(move || {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let mut handlers = inner.handlers.lock().unwrap_or_else(PoisonError::into_inner);
            if handlers.get(&channel).is_some_and(|slot| slot.id == id) {
                handlers.remove(&channel);
                debug!("Removed responder on '{}'", channel);
            }
        })
    }
}

async fn pump(inner: Weak<BackendInner>, mut receiver: mpsc::UnboundedReceiver<(Uuid, String)>) {
    while let Some((peer, raw)) = receiver.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        inner.receive(peer, &raw);
    }
}

impl BackendInner {
    fn receive(self: &Arc<Self>, peer: Uuid, raw: &str) {
        let frame = match Frame::decode(raw) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Dropping undecodable frame from {}: {}", peer, e);
                return;
            }
        };

        match frame {
            Frame::Message { channel, args } => {
                let channel = match WireChannel::parse(&channel) {
                    Ok(channel) => channel,
                    Err(e) => {
                        warn!("Dropping message from {}: {}", peer, e);
                        return;
                    }
                };
                let event = IpcEvent {
                    channel,
                    sender: peer,
                };
                self.listeners.emit(&event, &args);
            }
            Frame::Invoke {
                request_id,
                channel,
                args,
            } => self.serve(peer, request_id, &channel, args),
            Frame::Reply { request_id, .. } => {
                warn!("Dropping reply {} from {}: hosts do not invoke", request_id, peer);
            }
        }
    }

    fn serve(self: &Arc<Self>, peer: Uuid, request_id: Uuid, channel: &str, args: Vec<Value>) {
        let channel = match WireChannel::parse(channel) {
            Ok(channel) => channel,
            Err(e) => {
                warn!("Rejecting request {} from {}: {}", request_id, peer, e);
                self.reply(peer, request_id, ReplyOutcome::Failure(e.to_string()));
                return;
            }
        };

        let handler = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&channel)
            .map(|slot| Arc::clone(&slot.handler));
        let Some(handler) = handler else {
            self.reply(
                peer,
                request_id,
                ReplyOutcome::Failure(format!("No handler registered for '{channel}'")),
            );
            return;
        };

        let event = IpcEvent {
            channel,
            sender: peer,
        };
        // The peer is looked up again when the reply is ready; holding its sender here would
        // keep a disconnected frontend alive.
        let inner = Arc::downgrade(self);
        tokio::spawn(async move {
            // The responder is called inside the guarded future so a panic before its first
            // await is caught as well.
            let serving = async move { handler(event, args).await };
            let outcome = match AssertUnwindSafe(serving).catch_unwind().await {
                Ok(value) => ReplyOutcome::Value(value),
                Err(payload) => {
                    let reason = panic_reason(payload.as_ref());
                    error!("Responder for request {} panicked: {}", request_id, reason);
                    ReplyOutcome::Failure(reason)
                }
            };
            if let Some(inner) = inner.upgrade() {
                inner.reply(peer, request_id, outcome);
            }
        });
    }

    fn reply(&self, peer: Uuid, request_id: Uuid, outcome: ReplyOutcome) {
        let raw = match (Frame::Reply {
            request_id,
            outcome,
        })
        .encode()
        {
            Ok(raw) => raw,
            Err(e) => {
                error!("Dropping reply {}: {}", request_id, e);
                return;
            }
        };

        let peers = self.peers.lock().unwrap_or_else(PoisonError::into_inner);
        match peers.get(&peer) {
            Some(sender) if sender.send(raw).is_ok() => {}
            _ => debug!("Peer {} left before reply {} was delivered", peer, request_id),
        }
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("responder panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("responder panicked: {message}")
    } else {
        "responder panicked".to_string()
    }
}
