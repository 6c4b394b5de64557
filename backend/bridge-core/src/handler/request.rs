use crate::error::dispatch::DispatchError;
use crate::error::ipc::IpcError;
use crate::handler::args::FromArgs;
use crate::handler::split_method_name;
use crate::marshal::{marshal, marshal_panic};
use crate::socket::{IpcEvent, IpcRequestHandler};

use common::ErrorLocation;
use models::{IpcInvokeReturn, MarshalledError};

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{Debug, Formatter, Result as FormatResult};
use std::future::Future;
use std::panic::{AssertUnwindSafe, Location, catch_unwind};
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use log::{debug, error};
use serde::Serialize;
use serde_json::Value;

type MethodOutcome = BoxFuture<'static, Result<Value, MarshalledError>>;
type RequestMethod<H> =
    Arc<dyn Fn(Arc<H>, &[Value]) -> Result<MethodOutcome, DispatchError> + Send + Sync>;

/// A service reachable with `invoke` on a single channel.
///
/// Each request arrives as `(methodName, ...args)`; the method table decides which function
/// serves it. Register with [`IpcHost::register`](crate::host::IpcHost::register) or
/// [`IpcHost::register_handler`](crate::host::IpcHost::register_handler).
///
/// ```ignore
/// #[derive(Default)]
/// struct Calculator;
///
/// impl Calculator {
///     async fn divide(self: Arc<Self>, (a, b): (f64, f64)) -> Result<f64, RemoteError> {
///         if b == 0.0 {
///             return Err(RemoteError::new("div by zero"));
///         }
///         Ok(a / b)
///     }
/// }
///
/// impl IpcHandler for Calculator {
///     fn channel_name(&self) -> &str {
///         "calc"
///     }
///
///     fn methods() -> RequestMethods<Self> {
///         RequestMethods::new().method("divide", Self::divide)
///     }
/// }
/// ```
pub trait IpcHandler: Send + Sync + 'static {
    /// Logical channel name, namespaced by the registry.
    fn channel_name(&self) -> &str;

    fn methods() -> RequestMethods<Self>
    where
        Self: Sized;
}

/// Method table of an [`IpcHandler`], built once per registration.
pub struct RequestMethods<H> {
    methods: HashMap<String, RequestMethod<H>>,
}

impl<H> RequestMethods<H>
where
    H: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Adds (or replaces) the function serving `name`.
    ///
    /// The method's `Err` is marshalled with the concrete error type as its name; return a
    /// [`RemoteError`](crate::marshal::RemoteError) to choose the name and error number.
    pub fn method<A, R, E, F, Fut>(mut self, name: &str, method: F) -> Self
    where
        A: FromArgs + Send + 'static,
        F: Fn(Arc<H>, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: Serialize + Send + 'static,
        E: StdError + Send + 'static,
    {
        let entry = move |handler: Arc<H>, args: &[Value]| -> Result<MethodOutcome, DispatchError> {
            let args = A::from_args(args)?;
            let pending = method(handler, args);
            Ok(async move {
                let value = pending.await.map_err(|e| marshal(&e))?;
                serde_json::to_value(value).map_err(|e| marshal(&IpcError::from(e)))
            }
            .boxed())
        };
        self.methods.insert(name.to_string(), Arc::new(entry));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    fn get(&self, name: &str) -> Option<&RequestMethod<H>> {
        self.methods.get(name)
    }
}

impl<H> Default for RequestMethods<H>
where
    H: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Debug for RequestMethods<H> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        let mut names: Vec<&String> = self.methods.keys().collect();
        names.sort();
        formatter
            .debug_struct("RequestMethods")
            .field("methods", &names)
            .finish()
    }
}

/// Owns one registered [`IpcHandler`] and routes requests to its method table.
pub struct RequestDispatcher<H> {
    handler: Arc<H>,
    methods: Arc<RequestMethods<H>>,
}

impl<H> Clone for RequestDispatcher<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            methods: Arc::clone(&self.methods),
        }
    }
}

impl<H> RequestDispatcher<H>
where
    H: IpcHandler,
{
    pub fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
            methods: Arc::new(H::methods()),
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Serves one request. Every failure, including a panic inside the method, comes back as
    /// [`IpcInvokeReturn::Error`].
    pub async fn dispatch(&self, event: IpcEvent, args: Vec<Value>) -> IpcInvokeReturn {
        let outcome = match self.start(&event, &args) {
            Ok(pending) => match AssertUnwindSafe(pending).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(payload) => Err(marshal_panic(payload)),
            },
            Err(e) => Err(e),
        };
        IpcInvokeReturn::from(outcome)
    }

    /// Responder suitable for [`IpcSocketBackend::handle`](crate::socket::IpcSocketBackend::handle).
    pub fn into_request_handler(self) -> IpcRequestHandler {
        Arc::new(move |event: IpcEvent, args: Vec<Value>| {
            let dispatcher = self.clone();
            async move {
                let reply = dispatcher.dispatch(event, args).await;
                serde_json::to_value(&reply).unwrap_or_else(|e| {
                    // The caller sees a protocol error for the null reply.
                    error!("Failed to encode invoke result: {}", e);
                    Value::Null
                })
            }
            .boxed()
        })
    }

    fn start(&self, event: &IpcEvent, args: &[Value]) -> Result<MethodOutcome, MarshalledError> {
        let (name, rest) = split_method_name(event, args).map_err(|e| marshal(&e))?;

        let Some(method) = self.methods.get(name) else {
            debug!("No method '{}' on channel '{}'", name, event.channel);
            return Err(marshal(&DispatchError::UnknownMethod {
                message: format!("unknown method '{}' on channel '{}'", name, event.channel),
                location: ErrorLocation::from(Location::caller()),
            }));
        };

        let handler = Arc::clone(&self.handler);
        match catch_unwind(AssertUnwindSafe(|| method(handler, rest))) {
            Ok(started) => started.map_err(|e| marshal(&e)),
            Err(payload) => Err(marshal_panic(payload)),
        }
    }
}
