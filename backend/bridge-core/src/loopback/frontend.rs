use crate::error::ipc::IpcError;
use crate::loopback::frame::{Frame, ReplyOutcome};
use crate::loopback::listeners::ListenerTable;
use crate::socket::{IpcEvent, IpcListener, IpcSocket, IpcSocketFrontend, RemoveFunction};

use common::ErrorLocation;
use models::WireChannel;

use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FormatResult};
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use log::{debug, error, warn};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

struct FrontendInner {
    id: Uuid,
    host: Uuid,
    outbound: mpsc::UnboundedSender<(Uuid, String)>,
    listeners: Arc<ListenerTable>,
    pending: Mutex<HashMap<Uuid, oneshot::Sender<ReplyOutcome>>>,
    closed: AtomicBool,
}

/// App end of the in-process transport, created by
/// [`LoopbackBackend::connect`](crate::loopback::LoopbackBackend::connect).
#[derive(Clone)]
pub struct LoopbackFrontend {
    inner: Arc<FrontendInner>,
}

impl LoopbackFrontend {
    pub(crate) fn new(
        id: Uuid,
        host: Uuid,
        outbound: mpsc::UnboundedSender<(Uuid, String)>,
        receiver: mpsc::UnboundedReceiver<String>,
    ) -> Self {
        let inner = Arc::new(FrontendInner {
            id,
            host,
            outbound,
            listeners: Arc::new(ListenerTable::default()),
            pending: Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
        });
        tokio::spawn(pump(Arc::downgrade(&inner), receiver));
        Self { inner }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// False once the backend has dropped this link.
    pub fn is_connected(&self) -> bool {
        !self.inner.closed.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self, channel: &WireChannel) -> usize {
        self.inner.listeners.count(channel)
    }

    /// Invokes still waiting for a reply.
    pub fn pending_count(&self) -> usize {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Debug for LoopbackFrontend {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter
            .debug_struct("LoopbackFrontend")
            .field("id", &self.inner.id)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl IpcSocket for LoopbackFrontend {
    fn send(&self, channel: &WireChannel, args: Vec<Value>) {
        let frame = Frame::Message {
            channel: channel.to_string(),
            args,
        };
        match frame.encode() {
            Ok(raw) => {
                if self.inner.outbound.send((self.inner.id, raw)).is_err() {
                    debug!("Host gone; message on '{}' dropped", channel);
                }
            }
            Err(e) => error!("Dropping message on '{}': {}", channel, e),
        }
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

impl IpcSocketFrontend for LoopbackFrontend {
    fn invoke(
        &self,
        channel: &WireChannel,
        args: Vec<Value>,
    ) -> BoxFuture<'static, Result<Value, IpcError>> {
        let inner = Arc::clone(&self.inner);
        let channel = channel.clone();
        async move {
            let request_id = Uuid::new_v4();
            let (sender, receiver) = oneshot::channel();
            inner
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(request_id, sender);
            // Dropped on every exit, including the caller abandoning this future.
            let _pending = PendingRequest {
                inner: Arc::clone(&inner),
                request_id,
            };

            // Checked after inserting: the pump flags `closed` before it drains `pending`.
            if inner.closed.load(Ordering::SeqCst) {
                return Err(invoke_failure(&channel, "connection closed"));
            }

            let frame = Frame::Invoke {
                request_id,
                channel: channel.to_string(),
                args,
            };
            let raw = frame.encode()?;
            if inner.outbound.send((inner.id, raw)).is_err() {
                return Err(invoke_failure(&channel, "host is gone"));
            }

            match receiver.await {
                Ok(ReplyOutcome::Value(value)) => Ok(value),
                Ok(ReplyOutcome::Failure(reason)) => Err(invoke_failure(&channel, &reason)),
                Err(_) => Err(invoke_failure(&channel, "connection closed")),
            }
        }
        .boxed()
    }
}

/// Removes the waiter of one `invoke` from `pending` when the call ends.
struct PendingRequest {
    inner: Arc<FrontendInner>,
    request_id: Uuid,
}

impl Drop for PendingRequest {
    fn drop(&mut self) {
        self.inner.forget(self.request_id);
    }
}

#[track_caller]
fn invoke_failure(channel: &WireChannel, reason: &str) -> IpcError {
    IpcError::Transport {
        message: format!("Error invoking remote method '{channel}': {reason}"),
        location: ErrorLocation::from(Location::caller()),
    }
}

async fn pump(inner: Weak<FrontendInner>, mut receiver: mpsc::UnboundedReceiver<String>) {
    while let Some(raw) = receiver.recv().await {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        inner.receive(&raw);
    }

    if let Some(inner) = inner.upgrade() {
        inner.close();
    }
}

impl FrontendInner {
    fn receive(&self, raw: &str) {
        let frame = match Frame::decode(raw) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Dropping undecodable frame from host: {}", e);
                return;
            }
        };

        match frame {
            Frame::Message { channel, args } => {
                let channel = match WireChannel::parse(&channel) {
                    Ok(channel) => channel,
                    Err(e) => {
                        warn!("Dropping message from host: {}", e);
                        return;
                    }
                };
                let event = IpcEvent {
                    channel,
                    sender: self.host,
                };
                self.listeners.emit(&event, &args);
            }
            Frame::Reply {
                request_id,
                outcome,
            } => {
                let waiter = self
                    .pending
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(&request_id);
                match waiter {
                    Some(waiter) => {
                        // The caller may have stopped waiting (timeout); nothing to do then.
                        let _ = waiter.send(outcome);
                    }
                    None => debug!("Reply {} has no waiting request", request_id),
                }
            }
            Frame::Invoke { request_id, .. } => {
                warn!("Dropping request {} from host: apps do not serve", request_id);
            }
        }
    }

    fn forget(&self, request_id: Uuid) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&request_id);
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let abandoned = std::mem::take(
            &mut *self
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        if !abandoned.is_empty() {
            debug!("Link closed with {} pending request(s)", abandoned.len());
        }
        debug!("Loopback peer {} disconnected", self.id);
    }
}
