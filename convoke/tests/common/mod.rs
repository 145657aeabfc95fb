#![allow(dead_code)]

use convoke::{BoxError, Handler, JsonObject, Payload, Reply, Response};
use serde_json::Value;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Helpers
// ============================================================================

pub fn obj(value: Value) -> JsonObject {
    value
        .as_object()
        .cloned()
        .expect("test value must be a JSON object")
}

// ============================================================================
// Test Handlers
// ============================================================================

pub struct CountingHandler {
    pub call_count: Arc<AtomicUsize>,
    pub response: Option<Response>,
}

impl CountingHandler {
    pub fn new(call_count: Arc<AtomicUsize>, response: Option<Response>) -> Self {
        Self {
            call_count,
            response,
        }
    }
}

impl Handler for CountingHandler {
    fn call(&self, _payload: &Payload) -> Reply {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.response.clone().into()
    }
}

pub struct OrderRecordingHandler {
    pub id: usize,
    pub order: Arc<Mutex<Vec<usize>>>,
}

impl Handler for OrderRecordingHandler {
    fn call(&self, _payload: &Payload) -> Reply {
        self.order.lock().unwrap().push(self.id);
        Reply::Empty
    }
}

/// Answers asynchronously, echoing one payload field under a new name.
pub struct EchoHandler {
    pub field: &'static str,
    pub as_name: &'static str,
}

impl Handler for EchoHandler {
    fn call(&self, payload: &Payload) -> Reply {
        let Some(value) = payload.get(self.field).cloned() else {
            return Reply::Empty;
        };
        let name = self.as_name.to_string();
        Reply::pending(async move {
            let mut response = Response::new();
            response.insert(name, value);
            Ok::<_, BoxError>(response)
        })
    }
}
