//! Payload and response types.

use serde_json::{Map, Value};

/// A JSON object.
pub type JsonObject = Map<String, Value>;

/// The object handed to every handler on dispatch.
pub type Payload = JsonObject;

/// The object a handler produces.
pub type Response = JsonObject;

/// Shallow-merge `overlay` on top of `base`; keys in `overlay` win.
pub fn merge_shallow(base: &JsonObject, overlay: &JsonObject) -> JsonObject {
    let mut merged = base.clone();
    merged.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}
