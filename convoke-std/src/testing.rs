//! Testing utilities for Convoke.
//!
//! This module provides utilities to make testing dispatchers and handlers easier.
//!
//! # Features
//!
//! - [`RecordingHandler`]: A handler that records every payload it receives
//! - [`FailingHandler`]: A handler whose reply always fails
//! - [`LoopbackTransport`]: An in-process transport from a client to a server dispatcher

use crate::server::ServerDispatcher;
use convoke_core::{BoxError, Handler, Payload, Reply, Response, Transport};
use futures::future::{BoxFuture, FutureExt};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records all payloads it receives.
///
/// Useful for verifying which handlers a dispatch reached, and with what.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHandler::new();
/// dispatcher.register(recorder.clone());
///
/// dispatcher.dispatch(payload).await?;
///
/// assert_eq!(recorder.count(), 1);
/// ```
#[derive(Clone)]
pub struct RecordingHandler {
    payloads: Arc<Mutex<Vec<Payload>>>,
    reply: Option<Response>,
}

impl RecordingHandler {
    /// Create a recording handler that replies with nothing.
    pub fn new() -> Self {
        Self {
            payloads: Arc::new(Mutex::new(Vec::new())),
            reply: None,
        }
    }

    /// Create a recording handler that replies with `response`.
    pub fn replying(response: Response) -> Self {
        Self {
            payloads: Arc::new(Mutex::new(Vec::new())),
            reply: Some(response),
        }
    }

    /// Get a clone of the recorded payloads.
    pub fn payloads(&self) -> Vec<Payload> {
        self.payloads.lock().unwrap().clone()
    }

    /// Get the number of recorded payloads.
    pub fn count(&self) -> usize {
        self.payloads.lock().unwrap().len()
    }

    /// Clear all recorded payloads.
    pub fn clear(&self) {
        self.payloads.lock().unwrap().clear();
    }
}

impl Default for RecordingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for RecordingHandler {
    fn call(&self, payload: &Payload) -> Reply {
        self.payloads.lock().unwrap().push(payload.clone());
        self.reply.clone().into()
    }
}

// ============================================================================
// Failing Handler
// ============================================================================

/// A handler whose pending reply always fails with the given message.
#[derive(Clone)]
pub struct FailingHandler {
    message: String,
}

impl FailingHandler {
    /// Create a failing handler.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Handler for FailingHandler {
    fn call(&self, _payload: &Payload) -> Reply {
        let message = self.message.clone();
        Reply::pending(async move { Err::<Response, BoxError>(message.into()) })
    }
}

// ============================================================================
// Loopback Transport
// ============================================================================

/// A transport that hands client payloads straight to a server dispatcher.
///
/// Counts round trips so tests can assert when the client reached the server.
#[derive(Clone)]
pub struct LoopbackTransport {
    server: ServerDispatcher,
    sends: Arc<AtomicUsize>,
}

impl LoopbackTransport {
    /// Create a transport delivering to `server`.
    pub fn new(server: ServerDispatcher) -> Self {
        Self {
            server,
            sends: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of round trips performed.
    pub fn sends(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }
}

impl Transport for LoopbackTransport {
    fn send(&self, payload: Payload) -> BoxFuture<'static, Result<Response, BoxError>> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        self.server
            .dispatch_for_server_request(payload)
            .map(|res| res.map_err(|err| Box::new(err) as BoxError))
            .boxed()
    }
}
