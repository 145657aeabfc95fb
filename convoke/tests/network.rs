//! Server and client dispatchers, separately and wired together.

use convoke::{
    BoxError, ClientDispatcher, DispatchError, JsonEnvelope, NetworkDispatch, Payload, Response,
    ServerDispatcher,
    testing::{FailingHandler, LoopbackTransport, RecordingHandler},
};
use serde_json::json;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

mod common;
use common::{CountingHandler, EchoHandler, obj};

// ============================================================================
// Server
// ============================================================================

#[tokio::test]
async fn test_server_request_only_reaches_server_handlers() {
    let plain_calls = Arc::new(AtomicUsize::new(0));
    let server = ServerDispatcher::new(JsonEnvelope::new());
    server.register(CountingHandler::new(
        plain_calls.clone(),
        Some(obj(json!({"plain": true}))),
    ));
    server.register_for_server(|_: &Payload| obj(json!({"a": 1})));
    server.register_for_server(|_: &Payload| None::<Response>);
    server.register_for_server(|_: &Payload| obj(json!({"b": 2})));

    let response = server.dispatch_for_server_request(Payload::new()).await.unwrap();

    let expected = JsonEnvelope::new().seal(vec![obj(json!({"a": 1})), obj(json!({"b": 2}))]);
    assert_eq!(response, expected);
    assert_eq!(plain_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_server_request_failure_propagates() {
    let server = ServerDispatcher::new(JsonEnvelope::new());
    server.register_for_server(FailingHandler::new("db down"));

    let err = server
        .dispatch_for_server_request(Payload::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Handler { .. }));
}

// ============================================================================
// Client
// ============================================================================

fn offline_client(sends: Arc<AtomicUsize>) -> ClientDispatcher {
    ClientDispatcher::new(
        move |_: Payload| {
            sends.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, BoxError>(JsonEnvelope::new().seal(vec![obj(json!({"remote": 1}))])) }
        },
        JsonEnvelope::new(),
    )
}

#[tokio::test]
async fn test_client_send_count_lifecycle() {
    let sends = Arc::new(AtomicUsize::new(0));
    let client = offline_client(sends.clone());
    client.register(|_: &Payload| obj(json!({"local": 1})));

    client.dispatch(Payload::new()).await.unwrap();
    assert_eq!(sends.load(Ordering::SeqCst), 0);

    let tokens: Vec<_> = (0..3)
        .map(|_| client.register_for_server(RecordingHandler::new()))
        .collect();
    let results = client.dispatch(Payload::new()).await.unwrap();
    assert_eq!(sends.load(Ordering::SeqCst), 1);
    assert_eq!(results, vec![obj(json!({"local": 1})), obj(json!({"remote": 1}))]);

    for token in tokens {
        assert!(client.unregister(token));
    }
    let results = client.dispatch(Payload::new()).await.unwrap();
    assert_eq!(sends.load(Ordering::SeqCst), 1);
    assert_eq!(results, vec![obj(json!({"local": 1}))]);
}

#[tokio::test]
async fn test_client_server_handler_never_runs_locally() {
    let sends = Arc::new(AtomicUsize::new(0));
    let client = offline_client(sends);
    let recorder = RecordingHandler::new();
    client.register_for_server(recorder.clone());

    client.dispatch(Payload::new()).await.unwrap();
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn test_client_remote_results_follow_local_results() {
    let client = ClientDispatcher::new(
        |_: Payload| async {
            Ok::<_, BoxError>(JsonEnvelope::new().seal(vec![
                obj(json!({"r": 1})),
                obj(json!({"r": 2})),
            ]))
        },
        JsonEnvelope::new(),
    );
    client.register(|_: &Payload| obj(json!({"before": true})));
    client.register_for_server(RecordingHandler::new());
    client.register(|_: &Payload| obj(json!({"after": true})));

    let results = client.dispatch(Payload::new()).await.unwrap();
    assert_eq!(
        results,
        vec![
            obj(json!({"before": true})),
            obj(json!({"after": true})),
            obj(json!({"r": 1})),
            obj(json!({"r": 2})),
        ]
    );
}

#[tokio::test]
async fn test_client_malformed_response_is_decode_error() {
    let client = ClientDispatcher::new(
        |_: Payload| async { Ok::<_, BoxError>(obj(json!({"unexpected": "shape"}))) },
        JsonEnvelope::new(),
    );
    client.register_for_server(RecordingHandler::new());

    let err = client.dispatch(Payload::new()).await.unwrap_err();
    assert!(matches!(err, DispatchError::Decode(_)));
}

// ============================================================================
// Round Trip
// ============================================================================

/// Registers the same lookups on both halves, the way shared application
/// code runs on either side.
fn install<D: NetworkDispatch>(dispatcher: &D) {
    dispatcher.register(EchoHandler {
        field: "id",
        as_name: "local_id",
    });
    dispatcher.register_for_server(EchoHandler {
        field: "id",
        as_name: "server_id",
    });
    dispatcher.register_for_server(|payload: &Payload| {
        payload
            .get("user")
            .map(|user| obj(json!({"profile": {"user": user}})))
    });
}

#[tokio::test]
async fn test_round_trip_through_loopback() {
    let server = ServerDispatcher::new(JsonEnvelope::new());
    install(&server);

    let transport = LoopbackTransport::new(server.clone());
    let client = ClientDispatcher::new(transport.clone(), JsonEnvelope::new());
    install(&client);

    let view = client.clone_with_payload(obj(json!({"user": "ada"})));
    let results = view.dispatch(obj(json!({"id": 9}))).await.unwrap();

    assert_eq!(transport.sends(), 1);
    assert_eq!(
        results,
        vec![
            obj(json!({"local_id": 9})),
            obj(json!({"server_id": 9})),
            obj(json!({"profile": {"user": "ada"}})),
        ]
    );
}

#[tokio::test]
async fn test_round_trip_server_failure_fails_client() {
    let server = ServerDispatcher::new(JsonEnvelope::new());
    server.register_for_server(FailingHandler::new("db down"));

    let client = ClientDispatcher::new(LoopbackTransport::new(server), JsonEnvelope::new());
    client.register_for_server(RecordingHandler::new());

    let err = client.dispatch(Payload::new()).await.unwrap_err();
    assert!(matches!(err, DispatchError::Transport(_)));
}
