//! # convoke-core
//!
//! Core traits for the Convoke callback fan-out dispatcher.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! handler and transport crates that don't need the full `convoke-std`
//! implementation.
//!
//! # Model
//!
//! A dispatcher owns a set of [`Handler`]s, each registered under a unique
//! [`Token`]. Dispatching a [`Payload`] invokes every handler synchronously;
//! each answers with a [`Reply`]. Non-empty replies are awaited together and
//! collected, in registration order, into one `Vec<Response>`.
//!
//! Network dispatchers split handlers between the client and the server.
//! They reach the other side only through the injected [`Encoder`],
//! [`Decoder`] and [`Transport`] collaborators.
//!
//! # Error Types
//!
//! - [`DispatchError`] - A dispatch failed as a whole
//! - [`CodecError`] - A response envelope had the wrong shape

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod codec;
mod dispatcher;
mod error;
mod handler;
mod message;
mod token;

// Re-exports
pub use codec::{Decoder, Encoder, Transport};
pub use dispatcher::{Dispatch, DispatchFuture, NetworkDispatch, ResponseFuture};
pub use error::{BoxError, CodecError, DispatchError};
pub use handler::{Handler, Reply};
pub use message::{JsonObject, Payload, Response, merge_shallow};
pub use token::Token;
