//! The server side of a network dispatcher pair.

use crate::{
    dispatcher::Dispatcher, fanout::fan_out, network::ServerTokens, registry::HandlerRegistry,
};
use convoke_core::{
    Dispatch, DispatchError, DispatchFuture, Encoder, Handler, NetworkDispatch, Payload,
    ResponseFuture, Token,
};
use futures::future::FutureExt;
use std::sync::Arc;

/// A dispatcher running on the server, answering requests from clients.
///
/// Handlers registered with [`register_for_server`] are the ones a client's
/// request reaches. [`dispatch_for_server_request`] runs only those and
/// folds their results into a single response with the injected
/// [`Encoder`]. Plain registrations behave exactly as on a [`Dispatcher`].
///
/// [`register_for_server`]: ServerDispatcher::register_for_server
/// [`dispatch_for_server_request`]: ServerDispatcher::dispatch_for_server_request
#[derive(Clone)]
pub struct ServerDispatcher {
    dispatcher: Dispatcher,
    encoder: Arc<dyn Encoder>,
    server_tokens: ServerTokens,
}

impl ServerDispatcher {
    /// Create a server dispatcher with an empty registry.
    pub fn new<E: Encoder>(encoder: E) -> Self {
        Self::with_dispatcher(Dispatcher::new(), encoder)
    }

    /// Create a server dispatcher on top of an existing dispatcher.
    ///
    /// Handlers already registered on `dispatcher` stay plain registrations.
    pub fn with_dispatcher<E: Encoder>(dispatcher: Dispatcher, encoder: E) -> Self {
        Self {
            dispatcher,
            encoder: Arc::new(encoder),
            server_tokens: ServerTokens::new(),
        }
    }

    /// Register a handler, returning the token that unregisters it.
    pub fn register<H: Handler>(&self, handler: H) -> Token {
        self.dispatcher.register(handler)
    }

    /// Register a handler that answers client requests.
    pub fn register_for_server<H: Handler>(&self, handler: H) -> Token {
        let token = self.dispatcher.register(handler);
        self.server_tokens.insert(token);
        token
    }

    /// Remove a plain or server registration.
    pub fn unregister(&self, token: Token) -> bool {
        self.server_tokens.remove(token);
        self.dispatcher.unregister(token)
    }

    /// Dispatch to every handler, plain and server alike.
    pub fn dispatch(&self, payload: Payload) -> DispatchFuture {
        self.dispatcher.dispatch(payload)
    }

    /// The live handlers registered for the server, in registration order.
    pub fn server_handlers(&self) -> HandlerRegistry {
        self.dispatcher.read().subset(&self.server_tokens.tokens())
    }

    /// Answer a client request.
    ///
    /// Runs only the server handlers and encodes their aggregated results
    /// into one response object.
    pub fn dispatch_for_server_request(&self, payload: Payload) -> ResponseFuture {
        let payload = self.dispatcher.combined_payload(&payload);
        let results = fan_out(&payload, self.server_handlers().snapshot());
        let encoder = Arc::clone(&self.encoder);

        async move {
            let results = results.await?;
            encoder.encode(results).await.map_err(|err| {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "failed to encode server response");
                DispatchError::Encode(err)
            })
        }
        .boxed()
    }

    /// Get a view over the same registrations that merges `payload` under
    /// every dispatched payload.
    pub fn clone_with_payload(&self, payload: Payload) -> ServerDispatcher {
        ServerDispatcher {
            dispatcher: self.dispatcher.clone_with_payload(payload),
            encoder: Arc::clone(&self.encoder),
            server_tokens: self.server_tokens.clone(),
        }
    }
}

impl std::fmt::Debug for ServerDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerDispatcher")
            .field("dispatcher", &self.dispatcher)
            .field("server_tokens", &self.server_tokens)
            .finish_non_exhaustive()
    }
}

impl Dispatch for ServerDispatcher {
    fn register<H: Handler>(&self, handler: H) -> Token {
        ServerDispatcher::register(self, handler)
    }

    fn unregister(&self, token: Token) -> bool {
        ServerDispatcher::unregister(self, token)
    }

    fn dispatch(&self, payload: Payload) -> DispatchFuture {
        ServerDispatcher::dispatch(self, payload)
    }
}

impl NetworkDispatch for ServerDispatcher {
    fn register_for_server<H: Handler>(&self, handler: H) -> Token {
        ServerDispatcher::register_for_server(self, handler)
    }

    fn serve_request(&self, payload: Payload) -> Option<ResponseFuture> {
        Some(self.dispatch_for_server_request(payload))
    }
}
