//! Dispatcher capability traits.

use crate::{
    error::DispatchError,
    handler::Handler,
    message::{Payload, Response},
    token::Token,
};
use futures::future::BoxFuture;

/// The future returned by a dispatch.
///
/// It is `'static`: every handler has already been invoked by the time the
/// future is handed back, and only the waiting remains.
pub type DispatchFuture = BoxFuture<'static, Result<Vec<Response>, DispatchError>>;

/// The future answering a client's request with one encoded response.
pub type ResponseFuture = BoxFuture<'static, Result<Response, DispatchError>>;

/// The capability shared by every dispatcher variant.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a dispatcher",
    label = "missing `Dispatch` implementation",
    note = "Implement `Dispatch` to register handlers and fan payloads out to them."
)]
pub trait Dispatch: Send + Sync {
    /// Register a handler, returning the token that unregisters it.
    fn register<H: Handler>(&self, handler: H) -> Token;

    /// Remove a registration. Returns `false` if the token is not live.
    fn unregister(&self, token: Token) -> bool;

    /// Invoke every registered handler with `payload` and aggregate the
    /// non-empty results in registration order.
    fn dispatch(&self, payload: Payload) -> DispatchFuture;
}

/// A dispatcher that knows some handlers belong on the server.
///
/// Dispatchers without a network split implement this too, treating a
/// server registration as a plain one.
pub trait NetworkDispatch: Dispatch {
    /// Register a handler that must only run on the server.
    fn register_for_server<H: Handler>(&self, handler: H) -> Token;

    /// Answer a client's request, if this dispatcher is the serving half.
    ///
    /// Returns `None` for dispatchers that do not serve requests.
    fn serve_request(&self, payload: Payload) -> Option<ResponseFuture> {
        let _ = payload;
        None
    }
}
