//! Error types for Convoke.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`DispatchError`] - Errors that fail a whole dispatch
//! - [`CodecError`] - Errors from the bundled response envelope codec
//!
//! Unregistering an unknown token is not an error; it returns `false`.

use crate::token::Token;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during a dispatch.
///
/// A dispatch fails as a whole: if any kept handler fails, no partial
/// result is returned.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A kept handler's pending result failed.
    #[error("handler {token} failed")]
    Handler {
        /// The registration whose handler failed.
        token: Token,
        /// The underlying failure.
        #[source]
        source: BoxError,
    },

    /// The round trip to the server failed.
    #[error("server transport failed")]
    Transport(#[source] BoxError),

    /// The server response could not be decoded into results.
    #[error("failed to decode server response")]
    Decode(#[source] BoxError),

    /// The server-side results could not be encoded into a response.
    #[error("failed to encode server response")]
    Encode(#[source] BoxError),
}

impl DispatchError {
    /// Attribute a boxed failure to the handler registered under `token`.
    ///
    /// A [`Transport`] or [`Decode`] failure, as produced by the client
    /// bridge, is passed through unchanged. Any other failure, including a
    /// nested dispatch's own `Handler` error, is attributed to `token`.
    ///
    /// [`Transport`]: DispatchError::Transport
    /// [`Decode`]: DispatchError::Decode
    pub fn from_handler(token: Token, err: BoxError) -> Self {
        match err.downcast::<DispatchError>() {
            Ok(dispatch) if dispatch.is_round_trip() => *dispatch,
            Ok(nested) => DispatchError::Handler {
                token,
                source: nested,
            },
            Err(source) => DispatchError::Handler { token, source },
        }
    }

    fn is_round_trip(&self) -> bool {
        matches!(self, DispatchError::Transport(_) | DispatchError::Decode(_))
    }
}

/// Errors produced while encoding or decoding a response envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The envelope has no array under the expected key.
    #[error("response has no `{0}` array")]
    MissingField(String),

    /// An entry of the envelope array is not a JSON object.
    #[error("entry {index} of the response is not an object")]
    NotAnObject {
        /// Position of the offending entry.
        index: usize,
    },
}
