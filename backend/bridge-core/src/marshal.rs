//! Error marshalling codec.
//!
//! A failure raised while serving a request is flattened into a [`MarshalledError`] (plain
//! data, no live references) so it can travel inside an invoke result. The calling side turns it
//! back into a [`RemoteError`], which keeps the original message and stack and carries the name
//! and error number as data.

use crate::error::CoreError;
use crate::error::dispatch::DispatchError;
use crate::error::ipc::IpcError;

use models::{MarshalledError, UNKNOWN_ERROR_NAME};

use std::any::{Any, type_name};
use std::error::Error as StdError;
use std::fmt::{Display, Formatter, Result as FormatResult};

const DEFAULT_ERROR_NAME: &str = "Error";
const PANIC_ERROR_NAME: &str = "Panic";

/// A failure that crossed the process boundary.
///
/// Handlers can also return it directly to control the marshalled `name` and `errorNumber`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    name: String,
    message: String,
    error_number: i64,
    stack: Option<String>,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: DEFAULT_ERROR_NAME.to_string(),
            message: message.into(),
            error_number: 0,
            stack: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_error_number(mut self, error_number: i64) -> Self {
        self.error_number = error_number;
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn error_number(&self) -> i64 {
        self.error_number
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

impl Display for RemoteError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        if self.name.is_empty() {
            formatter.write_str(&self.message)
        } else {
            write!(formatter, "{}: {}", self.name, self.message)
        }
    }
}

impl StdError for RemoteError {}

impl From<MarshalledError> for RemoteError {
    fn from(error: MarshalledError) -> Self {
        unmarshal(error)
    }
}

/// Flattens a failure whose concrete type is known.
///
/// `name` is the [`RemoteError`] name when `thrown` is one, otherwise the concrete type name
/// (`DispatchError`, `ParseIntError`, …).
pub fn marshal<E>(thrown: &E) -> MarshalledError
where
    E: StdError + 'static,
{
    marshal_named(thrown, concrete_type_name::<E>())
}

/// Flattens a type-erased failure. Without a concrete type the name falls back to
/// [`UNKNOWN_ERROR_NAME`] unless the failure is a [`RemoteError`].
pub fn marshal_dyn(thrown: &(dyn StdError + 'static)) -> MarshalledError {
    marshal_named(thrown, None)
}

/// Rebuilds a raisable failure from its marshalled form.
pub fn unmarshal(error: MarshalledError) -> RemoteError {
    RemoteError {
        name: error.name,
        message: error.message,
        error_number: error.error_number,
        stack: error.stack,
    }
}

/// Flattens the payload of a caught panic.
pub(crate) fn marshal_panic(payload: Box<dyn Any + Send>) -> MarshalledError {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    };
    MarshalledError::new(PANIC_ERROR_NAME, message)
}

fn marshal_named(thrown: &(dyn StdError + 'static), name: Option<String>) -> MarshalledError {
    if let Some(core) = thrown.downcast_ref::<CoreError>() {
        return match core {
            CoreError::Ipc(e) => marshal(e),
            CoreError::Dispatch(e) => marshal(e),
            CoreError::Config(e) => marshal(e),
        };
    }

    // A failure relayed from another process keeps its original identity.
    if let Some(IpcError::Remote { source, .. }) = thrown.downcast_ref::<IpcError>() {
        return marshal(source);
    }

    if let Some(remote) = thrown.downcast_ref::<RemoteError>() {
        return MarshalledError {
            name: remote.name.clone(),
            message: remote.message.clone(),
            error_number: remote.error_number,
            stack: remote.stack.clone(),
        };
    }

    MarshalledError {
        name: name.unwrap_or_else(|| UNKNOWN_ERROR_NAME.to_string()),
        message: thrown.to_string(),
        error_number: 0,
        stack: stack_of(thrown),
    }
}

/// Raise site of crate errors, followed by the `source()` chain.
fn stack_of(thrown: &(dyn StdError + 'static)) -> Option<String> {
    let mut frames = Vec::new();

    if let Some(error) = thrown.downcast_ref::<IpcError>() {
        frames.push(error.location().stack_frame());
    } else if let Some(error) = thrown.downcast_ref::<DispatchError>() {
        frames.push(error.location().stack_frame());
    }

    let mut source = thrown.source();
    while let Some(cause) = source {
        frames.push(format!("    caused by: {cause}"));
        source = cause.source();
    }

    if frames.is_empty() {
        None
    } else {
        Some(frames.join("\n"))
    }
}

/// Last path segment of the type name, generics stripped. `None` for trait objects.
pub(crate) fn concrete_type_name<T: ?Sized>() -> Option<String> {
    let full = type_name::<T>();
    if full.starts_with("dyn ") {
        return None;
    }

    let base = full.split('<').next().unwrap_or(full);
    let name = base.rsplit("::").next().unwrap_or(base).trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
