//! # convoke - Callback Fan-Out Dispatcher
//!
//! `convoke` lets independent components contribute results to a shared
//! query. Each component registers a handler on a dispatcher; dispatching a
//! payload invokes every handler, drops the ones with nothing to say, awaits
//! the rest together and hands back their results in registration order.
//!
//! A network pair extends this across a client/server boundary. Handlers
//! registered "for the server" run on the server, and a client dispatch
//! transparently includes their results through one round trip.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use convoke::prelude::*;
//!
//! let dispatcher = Dispatcher::new();
//! dispatcher.register(|query: &Payload| query.get("id").map(|_| lookup_name()));
//! dispatcher.register(|_: &Payload| Reply::Empty);
//!
//! let results = dispatcher.dispatch(query).await?;
//! ```
//!
//! ## Client and Server
//!
//! ```rust,ignore
//! use convoke::{ClientDispatcher, JsonEnvelope, ServerDispatcher};
//!
//! let server = ServerDispatcher::new(JsonEnvelope::new());
//! server.register_for_server(expensive_lookup);
//!
//! let client = ClientDispatcher::new(http_transport, JsonEnvelope::new());
//! client.register_for_server(expensive_lookup);
//!
//! // One round trip; server results are spliced in with the local ones.
//! let results = client.dispatch(query).await?;
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use convoke_core::{
    // Error types
    BoxError,
    CodecError,
    // Network collaborators
    Decoder,
    // Dispatcher traits
    Dispatch,
    DispatchError,
    DispatchFuture,
    Encoder,
    // Handler
    Handler,
    // Message
    JsonObject,
    NetworkDispatch,
    Payload,
    Reply,
    Response,
    ResponseFuture,
    Token,
    Transport,
    merge_shallow,
};

// Dispatchers
pub use convoke_std::{
    client::ClientDispatcher,
    dispatcher::Dispatcher,
    server::ServerDispatcher,
};

// Data Sources
pub use convoke_std::data_source::{DataSource, NetworkDataSource, merge_results};

// Codec
pub use convoke_std::codec::{DEFAULT_KEY, JsonEnvelope};

/// Handler storage and the fan-out core.
pub mod registry {
    pub use convoke_std::{fanout::fan_out, network::ServerTokens, registry::HandlerRegistry};
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use convoke_std::testing::*;
}

/// Prelude module - common imports for Convoke.
///
/// # Usage
///
/// ```rust,ignore
/// use convoke::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        BoxError,
        ClientDispatcher,
        DataSource,
        // Core traits
        Dispatch,
        DispatchError,
        Dispatcher,
        Handler,
        NetworkDataSource,
        NetworkDispatch,
        // Message
        Payload,
        Reply,
        Response,
        ServerDispatcher,
        Token,
    };
}

/// Payloads and responses are `serde_json` objects.
pub use serde_json;
