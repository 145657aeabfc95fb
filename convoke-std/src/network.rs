//! State shared by the network dispatchers.

use convoke_core::Token;
use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// The set of tokens registered for the server.
///
/// Cloning yields another handle to the same set, so dispatcher views
/// created with `clone_with_payload` agree on which tokens are server-only.
#[derive(Debug, Clone, Default)]
pub struct ServerTokens(Arc<Mutex<BTreeSet<Token>>>);

impl ServerTokens {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `token` as server-only.
    pub fn insert(&self, token: Token) {
        self.lock().insert(token);
    }

    /// Unmark `token`. Returns `false` if it was not server-only.
    pub fn remove(&self, token: Token) -> bool {
        self.lock().remove(&token)
    }

    /// Whether `token` is server-only.
    pub fn contains(&self, token: Token) -> bool {
        self.lock().contains(&token)
    }

    /// Copy of the current tokens, in registration order.
    pub fn tokens(&self) -> Vec<Token> {
        self.lock().iter().copied().collect()
    }

    /// Get the number of server-only tokens.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if no token is server-only.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<Token>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
