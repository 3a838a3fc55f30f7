use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
    routing::get,
};
use passvault::Config;
use passvault::router::service_layers;
use serde_json::Value;
use tower::ServiceExt;

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "too late"
}

async fn boom() -> &'static str {
    panic!("handler blew up")
}

fn layered_app() -> Router {
    let cfg = Config {
        request_timeout: Duration::from_millis(20),
        ..Config::default()
    };
    let router = Router::new()
        .route("/slow", get(slow))
        .route("/boom", get(boom))
        .route("/fast", get(|| async { "ok" }));
    service_layers(router, &cfg)
}

async fn call(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, bytes.to_vec())
}

#[tokio::test]
async fn slow_handler_times_out_with_408() {
    let (status, _) = call(layered_app(), "/slow").await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

    let (status, body) = call(layered_app(), "/fast").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn handler_panic_becomes_json_500() {
    let (status, body) = call(layered_app(), "/boom").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body).expect("panic body was not JSON");
    assert_eq!(body["error"], "internal server error");
}
