//! Registration tokens.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// An opaque handle identifying one registration.
///
/// Tokens are minted from a single process-wide counter, so no two tokens
/// are ever equal. Later tokens compare greater than earlier ones, which lets
/// ordered maps keyed by `Token` iterate in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(u64);

impl Token {
    /// Mint a fresh token, distinct from every token minted before it.
    pub fn mint() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
