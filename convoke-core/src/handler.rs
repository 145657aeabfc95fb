//! # Handlers
//!
//! A handler is invoked synchronously with each dispatched payload and
//! answers with a [`Reply`]: nothing, a ready response, or a response still
//! being computed.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|payload: &Payload| Some(response)`
//! 2. **Deferred work**: `|payload: &Payload| Reply::pending(async move { ... })`
//! 3. **Struct implementation**: `impl Handler for MyHandler`

use crate::{
    error::BoxError,
    message::{Payload, Response},
};
use futures::future::{BoxFuture, FutureExt};
use std::{fmt, future::Future};

/// What a handler produced for one payload.
///
/// Only [`Reply::Empty`] is excluded from a dispatch result. The decision is
/// made when the reply is produced: a pending reply is always kept, whatever
/// it eventually resolves to.
pub enum Reply {
    /// No result; the handler is skipped in the aggregate.
    Empty,
    /// A result available immediately. Kept even if the object is empty.
    Ready(Response),
    /// A single result still being computed.
    Pending(BoxFuture<'static, Result<Response, BoxError>>),
    /// Several results still being computed. Each element becomes its own
    /// entry in the aggregate, in order.
    Batch(BoxFuture<'static, Result<Vec<Response>, BoxError>>),
}

impl Reply {
    /// Wrap a future producing a single response.
    pub fn pending<F, E>(future: F) -> Self
    where
        F: Future<Output = Result<Response, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        Reply::Pending(future.map(|res| res.map_err(Into::into)).boxed())
    }

    /// Wrap a future producing several responses.
    pub fn batch<F, E>(future: F) -> Self
    where
        F: Future<Output = Result<Vec<Response>, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        Reply::Batch(future.map(|res| res.map_err(Into::into)).boxed())
    }

    /// Whether this reply is excluded from aggregation.
    pub fn is_empty(&self) -> bool {
        matches!(self, Reply::Empty)
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Empty => f.write_str("Empty"),
            Reply::Ready(response) => f.debug_tuple("Ready").field(response).finish(),
            Reply::Pending(_) => f.write_str("Pending(..)"),
            Reply::Batch(_) => f.write_str("Batch(..)"),
        }
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Reply::Ready(response)
    }
}

impl From<Option<Response>> for Reply {
    fn from(response: Option<Response>) -> Self {
        response.map_or(Reply::Empty, Reply::Ready)
    }
}

/// A callback registered with a dispatcher.
///
/// Invocation is synchronous; any asynchronous work is returned inside the
/// [`Reply`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be registered as a handler",
    label = "missing `Handler` implementation",
    note = "Closures must take `&Payload` and return `Reply`, `Response` or `Option<Response>`."
)]
pub trait Handler: Send + Sync + 'static {
    /// Invoke the handler with a payload.
    fn call(&self, payload: &Payload) -> Reply;
}

// Blanket impl for closures
impl<F, R> Handler for F
where
    F: Fn(&Payload) -> R + Send + Sync + 'static,
    R: Into<Reply>,
{
    fn call(&self, payload: &Payload) -> Reply {
        (self)(payload).into()
    }
}
