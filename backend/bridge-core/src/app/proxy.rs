//! Typed call stubs over [`IpcApp::call_ipc_channel`].
//!
//! [`IpcProxy`] calls methods of a request handler by name. [`IpcFunctionProxy`] routes every
//! call through one serving function (the dialog channel's `callDialog`). The
//! [`ipc_proxy!`](crate::ipc_proxy) and [`ipc_function_proxy!`](crate::ipc_function_proxy)
//! macros declare stub structs with one typed async method per wire method.

use crate::app::IpcApp;
use crate::error::ipc::IpcError;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Serializes one stub argument.
pub fn to_arg<T>(arg: &T) -> Result<Value, IpcError>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_value(arg)?)
}

#[derive(Debug, Clone)]
pub struct IpcProxy {
    app: IpcApp,
    channel: String,
}

impl IpcProxy {
    pub(crate) fn new(app: IpcApp, channel: &str) -> Self {
        Self {
            app,
            channel: channel.to_string(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Same as `call_ipc_channel(channel, method, args)`, with the result decoded as `R`.
    pub async fn call<R>(&self, method: &str, args: Vec<Value>) -> Result<R, IpcError>
    where
        R: DeserializeOwned,
    {
        self.app
            .call_ipc_channel_as(&self.channel, method, args)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct IpcFunctionProxy {
    app: IpcApp,
    channel: String,
    function: String,
}

impl IpcFunctionProxy {
    pub(crate) fn new(app: IpcApp, channel: &str, function: &str) -> Self {
        Self {
            app,
            channel: channel.to_string(),
            function: function.to_string(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    /// Same as `call_ipc_channel(channel, function, [method, ...args])`.
    pub async fn call<R>(&self, method: &str, args: Vec<Value>) -> Result<R, IpcError>
    where
        R: DeserializeOwned,
    {
        let mut forwarded = Vec::with_capacity(args.len() + 1);
        forwarded.push(Value::String(method.to_string()));
        forwarded.extend(args);
        self.app
            .call_ipc_channel_as(&self.channel, &self.function, forwarded)
            .await
    }
}

/// Declares a stub struct whose async methods call a request handler by method name.
///
/// ```ignore
/// ipc_proxy! {
///     pub struct CalculatorProxy(channel = "calc") {
///         fn divide(a: f64, b: f64) -> f64 = "divide";
///     }
/// }
///
/// let quotient = CalculatorProxy::new(&app).divide(4.0, 2.0).await?;
/// ```
#[macro_export]
macro_rules! ipc_proxy {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident(channel = $channel:expr) {
            $(
                $(#[$method_meta:meta])*
                fn $method:ident($($arg:ident: $arg_ty:ty),* $(,)?) -> $ret:ty = $wire:expr;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            proxy: $crate::app::IpcProxy,
        }

        impl $name {
            pub fn new(app: &$crate::app::IpcApp) -> Self {
                Self {
                    proxy: app.proxy($channel),
                }
            }

            $(
                $(#[$method_meta])*
                pub async fn $method(
                    &self,
                    $($arg: $arg_ty),*
                ) -> ::std::result::Result<$ret, $crate::error::ipc::IpcError> {
                    let args: ::std::vec::Vec<$crate::serde_json::Value> =
                        vec![$($crate::app::proxy::to_arg(&$arg)?),*];
                    self.proxy.call::<$ret>($wire, args).await
                }
            )*
        }
    };
}

/// Declares a stub struct whose async methods go through a single serving function, passing
/// the method name as its first argument.
#[macro_export]
macro_rules! ipc_function_proxy {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident(channel = $channel:expr, function = $function:expr) {
            $(
                $(#[$method_meta:meta])*
                fn $method:ident($($arg:ident: $arg_ty:ty),* $(,)?) -> $ret:ty = $wire:expr;
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            proxy: $crate::app::IpcFunctionProxy,
        }

        impl $name {
            pub fn new(app: &$crate::app::IpcApp) -> Self {
                Self {
                    proxy: app.function_proxy($channel, $function),
                }
            }

            $(
                $(#[$method_meta])*
                pub async fn $method(
                    &self,
                    $($arg: $arg_ty),*
                ) -> ::std::result::Result<$ret, $crate::error::ipc::IpcError> {
                    let args: ::std::vec::Vec<$crate::serde_json::Value> =
                        vec![$($crate::app::proxy::to_arg(&$arg)?),*];
                    self.proxy.call::<$ret>($wire, args).await
                }
            )*
        }
    };
}
