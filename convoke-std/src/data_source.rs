//! Lookup facade over a dispatcher.
//!
//! A data source registers lookup functions and answers a query with the
//! shallow merge of everything they returned.

use crate::{client::ClientDispatcher, dispatcher::Dispatcher, server::ServerDispatcher};
use convoke_core::{
    Decoder, Dispatch, DispatchError, Encoder, Handler, JsonObject, NetworkDispatch, Response,
    Token, Transport,
};

/// Merge lookup results in order; on a key collision the later result wins.
pub fn merge_results(results: &[Response]) -> JsonObject {
    let mut merged = JsonObject::new();
    for result in results {
        merged.extend(result.clone());
    }
    merged
}

/// Looks data up by fanning a query out to registered lookup functions.
#[derive(Debug, Clone, Default)]
pub struct DataSource<D = Dispatcher> {
    dispatcher: D,
}

impl DataSource<Dispatcher> {
    /// Create a data source over a fresh dispatcher.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: Dispatch> DataSource<D> {
    /// Create a data source over an existing dispatcher.
    pub fn with_dispatcher(dispatcher: D) -> Self {
        Self { dispatcher }
    }

    /// Register a lookup function.
    pub fn register<H: Handler>(&self, lookup: H) -> Token {
        self.dispatcher.register(lookup)
    }

    /// Unregister a lookup function. Returns `false` if the token is not live.
    pub fn unregister(&self, token: Token) -> bool {
        self.dispatcher.unregister(token)
    }

    /// Look up `query`, merging every result into one object.
    pub async fn lookup(&self, query: JsonObject) -> Result<JsonObject, DispatchError> {
        let results = self.dispatcher.dispatch(query).await?;
        Ok(merge_results(&results))
    }

    /// Get a reference to the underlying dispatcher.
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }
}

/// A data source whose lookup functions may live on the server.
#[derive(Debug, Clone)]
pub struct NetworkDataSource<D> {
    data_source: DataSource<D>,
}

impl NetworkDataSource<ServerDispatcher> {
    /// Create the server half, encoding request results with `encoder`.
    pub fn server<E: Encoder>(encoder: E) -> Self {
        Self::with_dispatcher(ServerDispatcher::new(encoder))
    }
}

impl NetworkDataSource<ClientDispatcher> {
    /// Create the client half, reaching the server through `transport`.
    pub fn client<T, C>(transport: T, decoder: C) -> Self
    where
        T: Transport,
        C: Decoder,
    {
        Self::with_dispatcher(ClientDispatcher::new(transport, decoder))
    }
}

impl<D: NetworkDispatch> NetworkDataSource<D> {
    /// Create a network data source over an existing dispatcher.
    pub fn with_dispatcher(dispatcher: D) -> Self {
        Self {
            data_source: DataSource::with_dispatcher(dispatcher),
        }
    }

    /// Register a lookup function that runs locally.
    pub fn register<H: Handler>(&self, lookup: H) -> Token {
        self.data_source.register(lookup)
    }

    /// Register a lookup function that runs on the server.
    pub fn register_for_server<H: Handler>(&self, lookup: H) -> Token {
        self.dispatcher().register_for_server(lookup)
    }

    /// Unregister a lookup function. Returns `false` if the token is not live.
    pub fn unregister(&self, token: Token) -> bool {
        self.data_source.unregister(token)
    }

    /// Look up `query`, merging every result into one object.
    pub async fn lookup(&self, query: JsonObject) -> Result<JsonObject, DispatchError> {
        self.data_source.lookup(query).await
    }

    /// Answer a client's lookup.
    ///
    /// On the server this is the encoded result of the server-only lookup
    /// functions. A dispatcher that does not serve requests falls back to a
    /// plain [`lookup`](NetworkDataSource::lookup).
    pub async fn lookup_for_server_request(
        &self,
        query: JsonObject,
    ) -> Result<Response, DispatchError> {
        match self.dispatcher().serve_request(query.clone()) {
            Some(response) => response.await,
            None => self.lookup(query).await,
        }
    }

    /// Get a reference to the underlying dispatcher.
    pub fn dispatcher(&self) -> &D {
        self.data_source.dispatcher()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoke_core::{BoxError, Payload, Reply};
    use serde_json::{Value, json};

    fn obj(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_merge_results_later_wins() {
        let merged = merge_results(&[
            obj(json!({"name": "a", "size": 1})),
            obj(json!({"size": 2})),
            obj(json!({"color": "red"})),
        ]);
        assert_eq!(merged, obj(json!({"name": "a", "size": 2, "color": "red"})));
    }

    #[test]
    fn test_merge_results_empty() {
        assert!(merge_results(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_lookup_merges() {
        let source = DataSource::new();
        source.register(|q: &Payload| q.get("id").map(|id| obj(json!({"id": id, "name": "first"}))));
        source.register(|_: &Payload| {
            Reply::pending(async { Ok::<_, BoxError>(obj(json!({"name": "second"}))) })
        });

        let found = source.lookup(obj(json!({"id": 4}))).await.unwrap();
        assert_eq!(found, obj(json!({"id": 4, "name": "second"})));
    }

    #[tokio::test]
    async fn test_unregister_lookup() {
        let source = DataSource::new();
        let token = source.register(|_: &Payload| obj(json!({"hit": true})));
        assert!(source.unregister(token));
        assert!(!source.unregister(token));
        assert!(source.lookup(Payload::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_plain_dispatcher_falls_back() {
        let source = NetworkDataSource::with_dispatcher(Dispatcher::new());
        source.register(|_: &Payload| obj(json!({"local": true})));
        source.register_for_server(|_: &Payload| obj(json!({"remote": true})));

        let merged = obj(json!({"local": true, "remote": true}));
        assert_eq!(source.lookup(Payload::new()).await.unwrap(), merged);
        assert_eq!(
            source.lookup_for_server_request(Payload::new()).await.unwrap(),
            merged
        );
    }

    #[tokio::test]
    async fn test_client_lookup_for_request_is_plain_lookup() {
        let source = NetworkDataSource::client(
            |_: Payload| async { Ok::<_, BoxError>(Response::new()) },
            |_: Response| async { Ok::<Vec<Response>, BoxError>(vec![obj(json!({"k": "server"}))]) },
        );
        source.register(|_: &Payload| obj(json!({"k": "local"})));
        source.register_for_server(|_: &Payload| None::<Response>);

        let found = source.lookup_for_server_request(Payload::new()).await.unwrap();
        assert_eq!(found, obj(json!({"k": "server"})));
    }

    #[tokio::test]
    async fn test_server_lookup_for_request() {
        let source = NetworkDataSource::server(|results: Vec<Response>| async move {
            Ok::<_, BoxError>(obj(json!({"results": results})))
        });
        source.register(|_: &Payload| obj(json!({"local": true})));
        source.register_for_server(|_: &Payload| obj(json!({"remote": true})));

        let response = source.lookup_for_server_request(Payload::new()).await.unwrap();
        assert_eq!(response, obj(json!({"results": [{"remote": true}]})));

        let merged = source.lookup(Payload::new()).await.unwrap();
        assert_eq!(merged, obj(json!({"local": true, "remote": true})));
    }
}
