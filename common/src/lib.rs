//! Shared primitives for the ipc-bridge crates.
//!
//! Everything here is dependency-light so both the wire model (`models`) and the
//! dispatch layer (`bridge-core`) can use it without pulling each other in.

pub mod error;

pub use error::error_location::ErrorLocation;

#[cfg(test)]
mod tests;
