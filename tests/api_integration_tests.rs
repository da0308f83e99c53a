//! Integration Tests for the worker host
//!
//! Drives the full router: proxied requests through the interceptor, the
//! control channel, notifications, sync and stats.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use offline_worker::{
    api::create_router,
    cache::{CacheStorage, MemoryCacheStorage},
    error::{Result, WorkerError},
    manifest::StaticAssetManifest,
    net::{cache_key, FetchRequest, FetchResponse, Fetcher},
    AppState, Config, ServiceWorker,
};
use serde_json::Value;
use tower::ServiceExt;
use url::Url;

const ORIGIN: &str = "http://localhost:8080";

// == Test Doubles ==

#[derive(Default)]
struct SiteFetcher {
    pages: Mutex<HashMap<String, String>>,
    offline: AtomicBool,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl SiteFetcher {
    fn with_page(self, path: &str, body: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url(path), body.to_string());
        self
    }
}

#[async_trait]
impl Fetcher for SiteFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.url.to_string());
        if self.offline.load(Ordering::SeqCst) {
            return Err(WorkerError::Network("connection refused".to_string()));
        }
        let pages = self.pages.lock().unwrap();
        Ok(match pages.get(&cache_key(&request.url)) {
            Some(body) => FetchResponse::new(StatusCode::OK, body.clone()),
            None => FetchResponse::new(StatusCode::NOT_FOUND, "Not Found"),
        })
    }
}

// == Helper Functions ==

fn url(path: &str) -> String {
    Url::parse(ORIGIN).unwrap().join(path).unwrap().to_string()
}

struct TestApp {
    app: Router,
    storage: Arc<MemoryCacheStorage>,
    fetcher: Arc<SiteFetcher>,
    worker: Arc<ServiceWorker>,
}

async fn create_test_app() -> TestApp {
    let config = Config {
        origin: ORIGIN.to_string(),
        ..Config::default()
    };
    let origin = Url::parse(ORIGIN).unwrap();
    let storage = Arc::new(MemoryCacheStorage::default());
    storage.open("quantivision-static-v0.9.0").await.unwrap();
    storage.open("quantivision-dynamic-v0.9.0").await.unwrap();

    let fetcher = Arc::new(
        SiteFetcher::default()
            .with_page("/", "<html>root</html>")
            .with_page("/index.html", "<html>index</html>")
            .with_page("/css/style.css", "body { margin: 0 }")
            .with_page("/team", "<html>team</html>"),
    );
    let manifest =
        StaticAssetManifest::resolve(&origin, &["/", "/index.html", "/css/style.css"]).unwrap();

    let worker =
        ServiceWorker::with_manifest(&config, storage.clone(), fetcher.clone(), manifest);
    worker.start().await.unwrap();

    let state = AppState::new(worker, origin);
    let worker = state.worker.clone();
    TestApp {
        app: create_router(state),
        storage,
        fetcher,
        worker,
    }
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

// == Lifecycle ==

#[tokio::test]
async fn test_start_prunes_stale_namespaces() {
    let test = create_test_app().await;

    assert_eq!(
        test.storage.keys().await,
        vec!["quantivision-static-v1.0.0"]
    );
    assert_eq!(test.storage.len("quantivision-static-v1.0.0").await, 3);
}

// == Proxied Requests ==

#[tokio::test]
async fn test_precached_asset_served_without_network() {
    let test = create_test_app().await;
    let installs = test.fetcher.calls.load(Ordering::SeqCst);

    let response = test.app.oneshot(get("/css/style.css")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response.into_body()).await, b"body { margin: 0 }");
    assert_eq!(test.fetcher.calls.load(Ordering::SeqCst), installs);
}

#[tokio::test]
async fn test_new_page_cached_in_dynamic_namespace() {
    let test = create_test_app().await;

    let response = test.app.clone().oneshot(get("/team")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    test.worker.shutdown().await;

    let cached = test
        .storage
        .match_in("quantivision-dynamic-v1.0.0", &url("/team"))
        .await;
    assert!(cached.is_some());

    // Served from cache once the network is gone
    test.fetcher.offline.store(true, Ordering::SeqCst);
    let response = test.app.oneshot(get("/team")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response.into_body()).await, b"<html>team</html>");
}

#[tokio::test]
async fn test_not_found_is_not_cached() {
    let test = create_test_app().await;

    let response = test.app.oneshot(get("/missing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    test.worker.shutdown().await;

    assert!(test.storage.match_url(&url("/missing")).await.is_none());
}

#[tokio::test]
async fn test_offline_html_gets_index() {
    let test = create_test_app().await;
    test.fetcher.offline.store(true, Ordering::SeqCst);

    let request = Request::builder()
        .uri("/pricing")
        .header("accept", "text/html,application/xhtml+xml")
        .body(Body::empty())
        .unwrap();
    let response = test.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response.into_body()).await, b"<html>index</html>");
}

#[tokio::test]
async fn test_offline_json_gets_503() {
    let test = create_test_app().await;
    test.fetcher.offline.store(true, Ordering::SeqCst);

    let request = Request::builder()
        .uri("/api/metrics")
        .header("accept", "application/json")
        .body(Body::empty())
        .unwrap();
    let response = test.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_bytes(response.into_body()).await, b"Offline");
}

#[tokio::test]
async fn test_post_passes_through_uncached() {
    let test = create_test_app().await;

    let response = test
        .app
        .oneshot(post_json("/team", r#"{"name":"x"}"#))
        .await
        .unwrap();
    // The fake site answers any method on a known path
    assert_eq!(response.status(), StatusCode::OK);
    test.worker.shutdown().await;

    assert!(!test.storage.has("quantivision-dynamic-v1.0.0").await);
    assert_eq!(test.worker.interceptor().stats().await.passthroughs, 1);
}

#[tokio::test]
async fn test_proxy_never_leaves_origin() {
    let test = create_test_app().await;

    test.app
        .clone()
        .oneshot(get("//evil.example/steal"))
        .await
        .unwrap();
    test.app
        .oneshot(post_json("//evil.example/upload", "{}"))
        .await
        .unwrap();

    let seen = test.fetcher.seen.lock().unwrap();
    assert!(seen.contains(&"http://localhost:8080//evil.example/steal".to_string()));
    assert!(seen.iter().all(|u| u.starts_with("http://localhost:8080/")));
}

#[tokio::test]
async fn test_offline_post_surfaces_network_error() {
    let test = create_test_app().await;
    test.fetcher.offline.store(true, Ordering::SeqCst);

    let response = test
        .app
        .oneshot(post_json("/contact", "{}"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// == Control Channel ==

#[tokio::test]
async fn test_get_version_message() {
    let test = create_test_app().await;

    let response = test
        .app
        .oneshot(post_json("/__worker/message", r#"{"type":"GET_VERSION"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["version"], "quantivision-static-v1.0.0");
}

#[tokio::test]
async fn test_skip_waiting_message() {
    let test = create_test_app().await;

    let response = test
        .app
        .oneshot(post_json("/__worker/message", r#"{"type":"SKIP_WAITING"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_unknown_message_ignored() {
    let test = create_test_app().await;

    let response = test
        .app
        .oneshot(post_json("/__worker/message", r#"{"hello":"world"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// == Notifications and Sync ==

#[tokio::test]
async fn test_push_notification() {
    let test = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/__worker/push")
        .body(Body::from("Quarterly report published"))
        .unwrap();
    let response = test.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["title"], "Quantivision");
    assert_eq!(json["body"], "Quarterly report published");
    assert_eq!(json["icon"], "/assets/logo.svg");
    assert_eq!(json["actions"][0]["action"], "explore");
    assert_eq!(json["actions"][1]["action"], "close");
}

#[tokio::test]
async fn test_notification_click_explore() {
    let test = create_test_app().await;

    let response = test
        .app
        .oneshot(post_json(
            "/__worker/notificationclick",
            r#"{"action":"explore"}"#,
        ))
        .await
        .unwrap();

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["kind"], "open_window");
    assert_eq!(json["url"], "/");
}

#[tokio::test]
async fn test_sync_endpoint() {
    let test = create_test_app().await;

    let response = test
        .app
        .oneshot(post_json("/__worker/sync", r#"{"tag":"background-sync"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["handled"], true);
}

#[tokio::test]
async fn test_sync_empty_tag_rejected() {
    let test = create_test_app().await;

    let response = test
        .app
        .oneshot(post_json("/__worker/sync", r#"{"tag":""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

// == Stats ==

#[tokio::test]
async fn test_stats_after_traffic() {
    let test = create_test_app().await;

    test.app.clone().oneshot(get("/")).await.unwrap();
    test.app.clone().oneshot(get("/team")).await.unwrap();
    test.worker.shutdown().await;

    let response = test.app.oneshot(get("/__worker/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["version"], "quantivision-static-v1.0.0");
    assert_eq!(json["state"], "activated");
    assert_eq!(json["controlling"], true);
    assert_eq!(json["static_entries"], 3);
    assert_eq!(json["cache_hits"], 1);
    assert_eq!(json["network_fetches"], 1);
    assert_eq!(json["cache_writes"], 1);
    assert_eq!(
        json["namespaces"],
        serde_json::json!(["quantivision-static-v1.0.0", "quantivision-dynamic-v1.0.0"])
    );
}
