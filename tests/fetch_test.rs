use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};
use std::time::Duration;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;

use bpmsort::fetch::{RateLimitedFetcher, RetryPolicy};

async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn quick_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        interval: Duration::from_millis(10),
        max_retries,
    }
}

async fn flaky(State(hits): State<Arc<AtomicU32>>) -> impl IntoResponse {
    if hits.fetch_add(1, Ordering::SeqCst) < 3 {
        (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response()
    } else {
        Json(json!({"answer": 42})).into_response()
    }
}

async fn throttled(State(hits): State<Arc<AtomicU32>>) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::SERVICE_UNAVAILABLE, "try later")
}

async fn teapot(State(hits): State<Arc<AtomicU32>>) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::IM_A_TEAPOT, "short and stout")
}

#[tokio::test]
async fn fetch_returns_parsed_body_on_success() {
    let app = Router::new().route("/doc", get(|| async { Json(json!({"rhythm": {"bpm": 120.0}})) }));
    let base = spawn_app(app).await;

    let fetcher = RateLimitedFetcher::with_policy(quick_policy(10));
    let body = fetcher.fetch(&format!("{base}/doc")).await.unwrap().unwrap();

    assert_eq!(body["rhythm"]["bpm"].as_f64(), Some(120.0));
}

#[tokio::test]
async fn fetch_retries_through_three_throttle_responses() {
    let hits = Arc::new(AtomicU32::new(0));
    let app = Router::new()
        .route("/flaky", get(flaky))
        .with_state(Arc::clone(&hits));
    let base = spawn_app(app).await;

    let fetcher = RateLimitedFetcher::with_policy(quick_policy(10));
    let body = fetcher
        .fetch(&format!("{base}/flaky"))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(body["answer"].as_i64(), Some(42));
    // three throttled attempts plus the successful one
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn fetch_gives_up_after_the_retry_bound() {
    let hits = Arc::new(AtomicU32::new(0));
    let app = Router::new()
        .route("/throttled", get(throttled))
        .with_state(Arc::clone(&hits));
    let base = spawn_app(app).await;

    let fetcher = RateLimitedFetcher::with_policy(quick_policy(3));
    let body = fetcher.fetch(&format!("{base}/throttled")).await.unwrap();

    assert!(body.is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn fetch_does_not_retry_other_error_statuses() {
    let hits = Arc::new(AtomicU32::new(0));
    let app = Router::new()
        .route("/teapot", get(teapot))
        .with_state(Arc::clone(&hits));
    let base = spawn_app(app).await;

    let fetcher = RateLimitedFetcher::with_policy(quick_policy(10));
    let body = fetcher.fetch(&format!("{base}/teapot")).await.unwrap();

    assert!(body.is_none());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fetch_propagates_transport_errors() {
    // nothing listens here
    let fetcher = RateLimitedFetcher::with_policy(quick_policy(2));
    let result = fetcher.fetch("http://127.0.0.1:1/none").await;

    assert!(result.is_err());
}
