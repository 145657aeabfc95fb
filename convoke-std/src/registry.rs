//! Handler registry keyed by registration token.

use convoke_core::{Handler, Token};
use std::{collections::BTreeMap, sync::Arc};

/// A registry of handlers, keyed by the token each registration returned.
///
/// Tokens are minted in increasing order, so iteration follows registration
/// order.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: BTreeMap<Token, Arc<dyn Handler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a handler under a freshly minted token.
    pub fn register<H: Handler>(&mut self, handler: H) -> Token {
        self.insert(Arc::new(handler))
    }

    /// Store an already shared handler under a freshly minted token.
    pub fn insert(&mut self, handler: Arc<dyn Handler>) -> Token {
        let token = Token::mint();
        self.handlers.insert(token, handler);
        token
    }

    /// Remove a registration. Returns `false` if the token is not live.
    pub fn unregister(&mut self, token: Token) -> bool {
        self.handlers.remove(&token).is_some()
    }

    /// The registrations whose token is in `tokens`.
    ///
    /// Tokens that are no longer registered are skipped.
    pub fn subset<'a, I>(&self, tokens: I) -> HandlerRegistry
    where
        I: IntoIterator<Item = &'a Token>,
    {
        let handlers = tokens
            .into_iter()
            .filter_map(|token| {
                self.handlers
                    .get(token)
                    .map(|handler| (*token, Arc::clone(handler)))
            })
            .collect();
        HandlerRegistry { handlers }
    }

    /// Iterate over registrations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (Token, &Arc<dyn Handler>)> {
        self.handlers.iter().map(|(token, handler)| (*token, handler))
    }

    /// Copy out the current registrations, in registration order.
    ///
    /// Dispatch works from a snapshot so that handlers may register or
    /// unregister while they are being invoked.
    pub fn snapshot(&self) -> Vec<(Token, Arc<dyn Handler>)> {
        self.handlers
            .iter()
            .map(|(token, handler)| (*token, Arc::clone(handler)))
            .collect()
    }

    /// Whether `token` is currently registered.
    pub fn contains(&self, token: Token) -> bool {
        self.handlers.contains_key(&token)
    }

    /// Get the number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}
