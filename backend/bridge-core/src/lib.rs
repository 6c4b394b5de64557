//! Bidirectional RPC between a privileged host process and its app processes.
//!
//! Many logical services share one transport. Each request carries a method name, the serving
//! side looks it up in a handler's method table, and the outcome comes back as an invoke result
//! (`{ result }` or `{ error }`). Notifications travel the same way without a reply.
//!
//! ## Layout
//!
//! - [`socket`]: transport capability traits the registries consume
//! - [`host`]: [`IpcHost`](host::IpcHost) registry and the built-in host services
//! - [`app`]: [`IpcApp`](app::IpcApp) registry, proxies and generated stubs
//! - [`handler`]: method tables and dispatchers for both handler kinds
//! - [`marshal`]: failure flattening for transport
//! - [`loopback`]: in-process transport
//! - [`config`]: `bridge.json`

pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod host;
pub mod loopback;
pub mod marshal;
pub mod socket;

#[doc(hidden)]
pub use serde_json;

#[cfg(test)]
mod tests;
