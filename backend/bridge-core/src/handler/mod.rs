//! Handler dispatch base.
//!
//! Both handler kinds receive `(methodName, ...args)` on their channel and look the name up in
//! an explicit table built once at registration. [`request`] serves `invoke` calls and always
//! answers with an invoke result; [`notification`] consumes fire-and-forget messages.

pub mod args;
pub mod notification;
pub mod request;

pub use args::{FromArgs, RestArgs};
pub use notification::{
    NotificationDispatcher, NotificationHandler, NotificationMethods,
    register_notification_handler,
};
pub use request::{IpcHandler, RequestDispatcher, RequestMethods};

use crate::error::dispatch::DispatchError;
use crate::socket::IpcEvent;

use common::ErrorLocation;

use std::panic::Location;

use serde_json::Value;

#[track_caller]
pub(crate) fn split_method_name<'a>(
    event: &IpcEvent,
    args: &'a [Value],
) -> Result<(&'a str, &'a [Value]), DispatchError> {
    match args.split_first() {
        Some((Value::String(name), rest)) => Ok((name.as_str(), rest)),
        Some((other, _)) => Err(DispatchError::MissingMethodName {
            message: format!(
                "expected a method name on channel '{}', got {}",
                event.channel, other
            ),
            location: ErrorLocation::from(Location::caller()),
        }),
        None => Err(DispatchError::MissingMethodName {
            message: format!("empty payload on channel '{}'", event.channel),
            location: ErrorLocation::from(Location::caller()),
        }),
    }
}
