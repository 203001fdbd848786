use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, mpsc};
use std::time::Duration;

use axum::{Json, Router, extract::Query, extract::State, routing::get};
use serde_json::json;

use bpmsort::fetch::{RateLimitedFetcher, RetryPolicy};
use bpmsort::musicbrainz::{build_query, resolve};

struct IndexStub {
    queries: Mutex<Vec<String>>,
}

fn stub() -> &'static Arc<IndexStub> {
    static STUB: OnceLock<Arc<IndexStub>> = OnceLock::new();
    STUB.get_or_init(|| {
        Arc::new(IndexStub {
            queries: Mutex::new(Vec::new()),
        })
    })
}

async fn search(
    Query(params): Query<HashMap<String, String>>,
    State(stub): State<Arc<IndexStub>>,
) -> Json<serde_json::Value> {
    let query = params.get("query").cloned().unwrap_or_default();
    stub.queries.lock().unwrap().push(query.clone());

    if query.contains("artist:Nobody") || query.contains("release:Wrong Album") {
        Json(json!({ "recordings": [] }))
    } else {
        Json(json!({ "recordings": [ { "id": "mbid-123" } ] }))
    }
}

/// Starts one stub index per test binary on its own runtime thread and
/// points `MUSICBRAINZ_API_URL` at it.
fn start_stub() {
    static STARTED: OnceLock<()> = OnceLock::new();
    STARTED.get_or_init(|| {
        let state = Arc::clone(stub());
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async move {
                let app = Router::new()
                    .route("/recording", get(search))
                    .with_state(state);
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });
        let addr = rx.recv().unwrap();
        unsafe {
            std::env::set_var("MUSICBRAINZ_API_URL", format!("http://{}/recording", addr));
        }
    });
}

fn fetcher() -> RateLimitedFetcher {
    RateLimitedFetcher::with_policy(RetryPolicy {
        interval: Duration::from_millis(10),
        max_retries: 3,
    })
}

fn queries_mentioning(needle: &str) -> Vec<String> {
    stub()
        .queries
        .lock()
        .unwrap()
        .iter()
        .filter(|q| q.contains(needle))
        .cloned()
        .collect()
}

#[test]
fn query_includes_all_clauses_in_order() {
    let query = build_query("Creep", "Radiohead", Some("Pablo Honey"));
    assert_eq!(
        query,
        "recording%3ACreep%20AND%20artist%3ARadiohead%20AND%20release%3APablo%20Honey%20AND%20NOT%20comment%3Alive"
    );
}

#[test]
fn query_without_album_omits_the_release_clause() {
    let query = build_query("Creep", "Radiohead", None);
    assert_eq!(
        query,
        "recording%3ACreep%20AND%20artist%3ARadiohead%20AND%20NOT%20comment%3Alive"
    );
}

#[tokio::test]
async fn resolve_returns_the_first_match() {
    start_stub();

    let mbid = resolve(&fetcher(), "Creep", "Direct Artist", Some("Pablo Honey"))
        .await
        .unwrap();

    assert_eq!(mbid.as_deref(), Some("mbid-123"));
    let queries = queries_mentioning("artist:Direct Artist");
    assert_eq!(queries.len(), 1);
    assert!(queries[0].contains("release:Pablo Honey"));
    assert!(queries[0].contains("NOT comment:live"));
}

#[tokio::test]
async fn resolve_falls_back_to_an_albumless_query_once() {
    start_stub();

    let mbid = resolve(&fetcher(), "Creep", "Fallback Artist", Some("Wrong Album"))
        .await
        .unwrap();

    assert_eq!(mbid.as_deref(), Some("mbid-123"));
    let queries = queries_mentioning("artist:Fallback Artist");
    assert_eq!(queries.len(), 2);
    assert!(queries[0].contains("release:Wrong Album"));
    assert!(!queries[1].contains("release:"));
}

#[tokio::test]
async fn resolve_gives_up_after_the_fallback_query() {
    start_stub();

    let mbid = resolve(&fetcher(), "Creep", "Nobody", Some("Wrong Album"))
        .await
        .unwrap();

    assert!(mbid.is_none());
    assert_eq!(queries_mentioning("artist:Nobody").len(), 2);
}

#[tokio::test]
async fn resolve_without_album_queries_only_once() {
    start_stub();

    let mbid = resolve(&fetcher(), "Creep", "Solo Artist", None).await.unwrap();

    assert_eq!(mbid.as_deref(), Some("mbid-123"));
    let queries = queries_mentioning("artist:Solo Artist");
    assert_eq!(queries.len(), 1);
    assert!(!queries[0].contains("release:"));
}
