//! The client side of a network dispatcher pair.
//!
//! On the client, a server registration does not run anything locally. The
//! first one installs a single *bridge* handler; the bridge sends the payload
//! to the server and appends the decoded results after the local ones.
//! Later server registrations only add bookkeeping tokens, and the bridge is
//! removed when the last of them is unregistered.

use crate::{dispatcher::Dispatcher, fanout::fan_out, network::ServerTokens};
use convoke_core::{
    Decoder, Dispatch, DispatchError, DispatchFuture, Handler, NetworkDispatch, Payload, Reply,
    Token, Transport,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The installed bridge, invoked after every local handler.
type Bridge = (Token, Arc<dyn Handler>);

/// A dispatcher running on the client, transparently including results
/// computed on the server.
#[derive(Clone)]
pub struct ClientDispatcher {
    dispatcher: Dispatcher,
    transport: Arc<dyn Transport>,
    decoder: Arc<dyn Decoder>,
    server_tokens: ServerTokens,
    bridge: Arc<Mutex<Option<Bridge>>>,
}

impl ClientDispatcher {
    /// Create a client dispatcher with an empty registry.
    pub fn new<T, D>(transport: T, decoder: D) -> Self
    where
        T: Transport,
        D: Decoder,
    {
        Self::with_dispatcher(Dispatcher::new(), transport, decoder)
    }

    /// Create a client dispatcher on top of an existing dispatcher.
    ///
    /// The bridge lives on the client dispatcher, so dispatching `dispatcher`
    /// directly never reaches the server.
    pub fn with_dispatcher<T, D>(dispatcher: Dispatcher, transport: T, decoder: D) -> Self
    where
        T: Transport,
        D: Decoder,
    {
        Self {
            dispatcher,
            transport: Arc::new(transport),
            decoder: Arc::new(decoder),
            server_tokens: ServerTokens::new(),
            bridge: Arc::new(Mutex::new(None)),
        }
    }

    /// Register a local handler, returning the token that unregisters it.
    pub fn register<H: Handler>(&self, handler: H) -> Token {
        self.dispatcher.register(handler)
    }

    /// Record a server registration.
    ///
    /// The handler itself runs on the server, so it is dropped here. The
    /// returned token keeps the bridge to the server alive until it is
    /// unregistered.
    pub fn register_for_server<H: Handler>(&self, _handler: H) -> Token {
        let mut bridge = self.bridge();
        if bridge.is_none() {
            let token = Token::mint();
            let handler: Arc<dyn Handler> = Arc::new(BridgeHandler {
                transport: Arc::clone(&self.transport),
                decoder: Arc::clone(&self.decoder),
            });
            #[cfg(feature = "tracing")]
            tracing::trace!(%token, "installed server bridge");
            *bridge = Some((token, handler));
        }

        let token = Token::mint();
        self.server_tokens.insert(token);
        token
    }

    /// Remove a local or server registration.
    ///
    /// Removing the last server registration also removes the bridge, after
    /// which dispatches make no network calls.
    pub fn unregister(&self, token: Token) -> bool {
        let mut bridge = self.bridge();
        if !self.server_tokens.remove(token) {
            drop(bridge);
            return self.dispatcher.unregister(token);
        }
        if !self.server_tokens.is_empty() {
            return true;
        }

        match bridge.take() {
            Some((bridge_token, _)) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(token = %bridge_token, "removed server bridge");
                #[cfg(not(feature = "tracing"))]
                let _ = bridge_token;
                true
            }
            None => false,
        }
    }

    /// Dispatch to the local handlers and, if any server registration is
    /// outstanding, to the server.
    ///
    /// Server results are appended after every local result, as siblings.
    /// The bridge is invoked in the same synchronous pass, after the last
    /// local handler.
    pub fn dispatch(&self, payload: Payload) -> DispatchFuture {
        let payload = self.dispatcher.combined_payload(&payload);
        let local = self.dispatcher.read().snapshot();
        let bridge = self.bridge().clone();
        fan_out(&payload, local.into_iter().chain(bridge))
    }

    /// Get a view over the same registrations that merges `payload` under
    /// every dispatched payload, including the one sent to the server.
    pub fn clone_with_payload(&self, payload: Payload) -> ClientDispatcher {
        ClientDispatcher {
            dispatcher: self.dispatcher.clone_with_payload(payload),
            transport: Arc::clone(&self.transport),
            decoder: Arc::clone(&self.decoder),
            server_tokens: self.server_tokens.clone(),
            bridge: Arc::clone(&self.bridge),
        }
    }

    /// Get the number of outstanding server registrations.
    pub fn server_registrations(&self) -> usize {
        self.server_tokens.len()
    }

    /// Whether the bridge to the server is installed.
    pub fn is_bridged(&self) -> bool {
        self.bridge().is_some()
    }

    fn bridge(&self) -> MutexGuard<'_, Option<Bridge>> {
        self.bridge.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ClientDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientDispatcher")
            .field("dispatcher", &self.dispatcher)
            .field("server_tokens", &self.server_tokens)
            .field("bridge", &self.bridge().as_ref().map(|(token, _)| *token))
            .finish_non_exhaustive()
    }
}

impl Dispatch for ClientDispatcher {
    fn register<H: Handler>(&self, handler: H) -> Token {
        ClientDispatcher::register(self, handler)
    }

    fn unregister(&self, token: Token) -> bool {
        ClientDispatcher::unregister(self, token)
    }

    fn dispatch(&self, payload: Payload) -> DispatchFuture {
        ClientDispatcher::dispatch(self, payload)
    }
}

impl NetworkDispatch for ClientDispatcher {
    fn register_for_server<H: Handler>(&self, handler: H) -> Token {
        ClientDispatcher::register_for_server(self, handler)
    }
}

/// The local handler standing in for every server registration.
struct BridgeHandler {
    transport: Arc<dyn Transport>,
    decoder: Arc<dyn Decoder>,
}

impl Handler for BridgeHandler {
    fn call(&self, payload: &Payload) -> Reply {
        let sent = self.transport.send(payload.clone());
        let decoder = Arc::clone(&self.decoder);

        Reply::batch(async move {
            let response = sent.await.map_err(DispatchError::Transport)?;
            decoder.decode(response).await.map_err(DispatchError::Decode)
        })
    }
}
