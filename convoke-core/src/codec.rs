//! Collaborators injected into network dispatchers.
//!
//! The dispatchers never move bytes themselves. A server dispatcher is given
//! an [`Encoder`] that folds its results into one response object; a client
//! dispatcher is given a [`Transport`] performing the round trip and a
//! [`Decoder`] that unfolds the server's response back into results.
//!
//! Each trait is implemented for closures returning a future, so
//! `|results| async move { ... }` works wherever an encoder is expected.

use crate::{
    error::BoxError,
    message::{Payload, Response},
};
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;

/// Folds the results of a server-side dispatch into one response object.
pub trait Encoder: Send + Sync + 'static {
    /// Encode the aggregated results.
    fn encode(&self, results: Vec<Response>) -> BoxFuture<'static, Result<Response, BoxError>>;
}

/// Unfolds a server response into the results it carries.
pub trait Decoder: Send + Sync + 'static {
    /// Decode a server response.
    fn decode(&self, response: Response) -> BoxFuture<'static, Result<Vec<Response>, BoxError>>;
}

/// Sends a payload to the server and returns its encoded response.
pub trait Transport: Send + Sync + 'static {
    /// Perform one round trip.
    fn send(&self, payload: Payload) -> BoxFuture<'static, Result<Response, BoxError>>;
}

impl<F, Fut, E> Encoder for F
where
    F: Fn(Vec<Response>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, E>> + Send + 'static,
    E: Into<BoxError>,
{
    fn encode(&self, results: Vec<Response>) -> BoxFuture<'static, Result<Response, BoxError>> {
        (self)(results).map(|res| res.map_err(Into::into)).boxed()
    }
}

impl<F, Fut, E> Decoder for F
where
    F: Fn(Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Response>, E>> + Send + 'static,
    E: Into<BoxError>,
{
    fn decode(&self, response: Response) -> BoxFuture<'static, Result<Vec<Response>, BoxError>> {
        (self)(response).map(|res| res.map_err(Into::into)).boxed()
    }
}

impl<F, Fut, E> Transport for F
where
    F: Fn(Payload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, E>> + Send + 'static,
    E: Into<BoxError>,
{
    fn send(&self, payload: Payload) -> BoxFuture<'static, Result<Response, BoxError>> {
        (self)(payload).map(|res| res.map_err(Into::into)).boxed()
    }
}
