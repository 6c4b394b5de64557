//! In-process transport.
//!
//! Implements the socket traits over Tokio channels so the registries can run end to end in
//! one process (tests, the smoke binary). Every message is encoded as a JSON frame on the way
//! through, so anything that crosses it would also cross a real process boundary.

pub mod backend;
pub mod frontend;

pub(crate) mod frame;
pub(crate) mod listeners;

pub use backend::LoopbackBackend;
pub use frontend::LoopbackFrontend;

/// A backend with one connected frontend. Must be called inside a Tokio runtime.
pub fn loopback_pair() -> (LoopbackBackend, LoopbackFrontend) {
    let backend = LoopbackBackend::new();
    let frontend = backend.connect();
    (backend, frontend)
}
