use super::*;
use crate::store::BatchStore;
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use std::time::Duration;
use tower::ServiceExt;


/// Helper to create a router over a fresh store, returning the store and
/// shutdown token for assertions
fn test_app(ttl: Duration) -> (Router, Arc<BatchStore>, CancellationToken) {
    let config = Arc::new(Config::default());
    let store = Arc::new(BatchStore::new(ttl));
    let checker = Arc::new(LinkChecker::new(store.clone(), config.clone()).unwrap());
    let token = CancellationToken::new();

    (create_router(checker, config, token.clone()), store, token)
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_api_server_starts_and_shuts_down() {
    let mut config = Config::default();
    config.server.bind_address = "127.0.0.1:0".parse().unwrap(); // OS assigns a free port
    config.server.shutdown_grace_secs = 1;
    let config = Arc::new(config);

    let store = Arc::new(BatchStore::new(Duration::from_secs(60)));
    let checker = Arc::new(LinkChecker::new(store, config.clone()).unwrap());
    let token = CancellationToken::new();

    let server_handle = tokio::spawn({
        let token = token.clone();
        async move { start_api_server(checker, config, token).await }
    });

    // Give it a moment to bind, then signal shutdown
    tokio::time::sleep(Duration::from_millis(100)).await;
    token.cancel();

    let result = tokio::time::timeout(Duration::from_secs(5), server_handle)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cors_enabled() {
    let (app, _store, _token) = test_app(Duration::from_secs(60));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}
