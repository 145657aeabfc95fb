//! A JSON envelope codec for server responses.

use convoke_core::{BoxError, CodecError, Decoder, Encoder, JsonObject, Response};
use futures::future::{self, BoxFuture, FutureExt};
use serde_json::Value;

/// The default envelope key.
pub const DEFAULT_KEY: &str = "results";

/// Wraps a server's results as `{"results": [...]}` and unwraps them again
/// on the client.
#[derive(Debug, Clone)]
pub struct JsonEnvelope {
    key: String,
}

impl JsonEnvelope {
    /// Create an envelope using the [`DEFAULT_KEY`].
    pub fn new() -> Self {
        Self::with_key(DEFAULT_KEY)
    }

    /// Create an envelope storing results under `key`.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// The key results are stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Wrap `results` into a single response object.
    pub fn seal(&self, results: Vec<Response>) -> Response {
        let mut envelope = JsonObject::new();
        envelope.insert(
            self.key.clone(),
            Value::Array(results.into_iter().map(Value::Object).collect()),
        );
        envelope
    }

    /// Unwrap a response object produced by [`JsonEnvelope::seal`].
    pub fn open(&self, mut response: Response) -> Result<Vec<Response>, CodecError> {
        let Some(Value::Array(entries)) = response.remove(&self.key) else {
            return Err(CodecError::MissingField(self.key.clone()));
        };

        entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                Value::Object(object) => Ok(object),
                _ => Err(CodecError::NotAnObject { index }),
            })
            .collect()
    }
}

impl Default for JsonEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for JsonEnvelope {
    fn encode(&self, results: Vec<Response>) -> BoxFuture<'static, Result<Response, BoxError>> {
        future::ready(Ok(self.seal(results))).boxed()
    }
}

impl Decoder for JsonEnvelope {
    fn decode(&self, response: Response) -> BoxFuture<'static, Result<Vec<Response>, BoxError>> {
        let decoded = self.open(response).map_err(|err| Box::new(err) as BoxError);
        future::ready(decoded).boxed()
    }
}
