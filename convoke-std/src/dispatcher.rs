//! The base dispatcher.

use crate::{fanout::fan_out, registry::HandlerRegistry};
use convoke_core::{
    Dispatch, DispatchFuture, Handler, NetworkDispatch, Payload, Token, merge_shallow,
};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A registry shared between a dispatcher and the views cloned from it.
pub(crate) type SharedRegistry = Arc<RwLock<HandlerRegistry>>;

/// Fans payloads out to registered handlers and aggregates their results.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = Dispatcher::new();
/// let token = dispatcher.register(|query: &Payload| query.get("id").map(|_| lookup(query)));
///
/// let results = dispatcher.dispatch(query).await?;
/// dispatcher.unregister(token);
/// ```
///
/// # Views
///
/// [`Dispatcher::clone_with_payload`] returns a second dispatcher over the
/// *same* registry that merges a fixed base payload under every dispatched
/// one. Registrations made through either are visible through both.
#[derive(Clone, Default)]
pub struct Dispatcher {
    registry: SharedRegistry,
    base_payload: Payload,
}

impl Dispatcher {
    /// Create a dispatcher with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, returning the token that unregisters it.
    pub fn register<H: Handler>(&self, handler: H) -> Token {
        let token = self.write().register(handler);
        #[cfg(feature = "tracing")]
        tracing::debug!(%token, "registered handler");
        token
    }

    /// Remove a registration. Returns `false` if the token is not live.
    pub fn unregister(&self, token: Token) -> bool {
        let removed = self.write().unregister(token);
        #[cfg(feature = "tracing")]
        tracing::debug!(%token, removed, "unregistered handler");
        removed
    }

    /// Dispatch `payload` (merged over the base payload) to every handler.
    ///
    /// Handlers are invoked before this method returns; the returned future
    /// only waits for their pending replies.
    pub fn dispatch(&self, payload: Payload) -> DispatchFuture {
        let payload = self.combined_payload(&payload);
        let snapshot = self.read().snapshot();
        fan_out(&payload, snapshot)
    }

    /// Get a view over the same registry that merges `payload` under every
    /// dispatched payload.
    pub fn clone_with_payload(&self, payload: Payload) -> Dispatcher {
        Dispatcher {
            registry: Arc::clone(&self.registry),
            base_payload: self.combined_payload(&payload),
        }
    }

    /// The base payload merged under every dispatch.
    pub fn base_payload(&self) -> &Payload {
        &self.base_payload
    }

    /// Get the number of registered handlers.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub(crate) fn combined_payload(&self, payload: &Payload) -> Payload {
        merge_shallow(&self.base_payload, payload)
    }

    // Registry mutations are single map operations, so a poisoned lock
    // still guards a consistent map.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, HandlerRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HandlerRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &*self.read())
            .field("base_payload", &self.base_payload)
            .finish()
    }
}

impl Dispatch for Dispatcher {
    fn register<H: Handler>(&self, handler: H) -> Token {
        Dispatcher::register(self, handler)
    }

    fn unregister(&self, token: Token) -> bool {
        Dispatcher::unregister(self, token)
    }

    fn dispatch(&self, payload: Payload) -> DispatchFuture {
        Dispatcher::dispatch(self, payload)
    }
}

/// A plain dispatcher has no server half: server registrations run locally.
impl NetworkDispatch for Dispatcher {
    fn register_for_server<H: Handler>(&self, handler: H) -> Token {
        Dispatcher::register(self, handler)
    }
}
