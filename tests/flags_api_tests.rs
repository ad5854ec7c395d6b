use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use flag_toggle::db::{self, FEATURE_FLAG, FlagStore, RetryPolicy, SqliteFlagStore};
use flag_toggle::router::{FlagState, flag_router};
use flag_toggle::FlagService;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    _dir: TempDir,
    url: String,
    store: SqliteFlagStore,
    service: Arc<FlagService>,
    app: Router,
}

fn database_url(dir: &TempDir) -> String {
    format!("sqlite:{}", dir.path().join("flags.sqlite").display())
}

async fn boot(dir: TempDir) -> TestApp {
    let url = database_url(&dir);
    let store = SqliteFlagStore::connect(&url, 1)
        .await
        .expect("failed to open sqlite store");
    let service = Arc::new(FlagService::new(Arc::new(store.clone())));
    service.initialize().await.expect("initialize failed");
    let app = flag_router(FlagState::new(service.clone()));
    TestApp {
        _dir: dir,
        url,
        store,
        service,
        app,
    }
}

async fn fresh_app() -> TestApp {
    boot(tempfile::tempdir().expect("tempdir")).await
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, header::HeaderMap, Vec<u8>) {
    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, headers, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build request")
}

fn post_flags(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/flags")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

async fn current_flags(app: &Router) -> Value {
    let (status, _, body) = send(app, get("/api/flags")).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).expect("flags body is json")
}

#[tokio::test]
async fn fresh_store_toggle_scenario() {
    let t = fresh_app().await;
    assert!(!t.store.read_flag(FEATURE_FLAG).await.unwrap());
    assert_eq!(current_flags(&t.app).await, json!({ "feature-flag-1": false }));

    let (status, headers, body) = send(&t.app, post_flags(r#"{"state": true}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "success": true }));

    assert_eq!(current_flags(&t.app).await, json!({ "feature-flag-1": true }));
    assert!(t.store.read_flag(FEATURE_FLAG).await.unwrap());
}

#[tokio::test]
async fn toggling_back_and_forth_round_trips() {
    let t = fresh_app().await;
    for state in [true, false, true, false] {
        let (status, _, _) = send(&t.app, post_flags(&format!(r#"{{"state": {state}}}"#))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(t.service.get_state(), state);
        assert_eq!(t.store.read_flag(FEATURE_FLAG).await.unwrap(), state);
    }
}

#[tokio::test]
async fn state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let url = database_url(&dir);
    {
        let store = SqliteFlagStore::connect(&url, 1).await.unwrap();
        let service = FlagService::new(Arc::new(store.clone()));
        service.initialize().await.unwrap();
        service.set_state(true).await.unwrap();
        store.pool().close().await;
    }

    // Fresh cache, same store.
    let t = boot(dir).await;
    assert!(t.service.get_state());
    assert_eq!(current_flags(&t.app).await, json!({ "feature-flag-1": true }));
}

#[tokio::test]
async fn bootstrap_does_not_overwrite_existing_value() {
    let t = fresh_app().await;
    t.store.write_flag(FEATURE_FLAG, true).await.unwrap();

    t.store.ensure_default_row(FEATURE_FLAG, false).await.unwrap();
    t.service.initialize().await.unwrap();

    assert!(t.store.read_flag(FEATURE_FLAG).await.unwrap());
    assert!(t.service.get_state());
}

#[tokio::test]
async fn malformed_bodies_are_rejected_without_mutation() {
    let t = fresh_app().await;
    let before = t.service.get_state();

    for body in [r#"{"stat": true}"#, "not json", r#"{"state": "on"}"#, ""] {
        let (status, headers, text) = send(&t.app, post_flags(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert!(
            headers
                .get(header::CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/plain")
        );
        assert_eq!(std::str::from_utf8(&text).unwrap(), "Invalid request data");
        assert_eq!(t.service.get_state(), before);
    }
    assert_eq!(t.store.read_flag(FEATURE_FLAG).await.unwrap(), before);
}

#[tokio::test]
async fn body_is_accepted_without_json_content_type() {
    let t = fresh_app().await;
    let req = Request::builder()
        .method("POST")
        .uri("/api/flags")
        .header("content-type", "text/plain")
        .body(Body::from(r#"{"state": true}"#))
        .unwrap();
    let (status, _, _) = send(&t.app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(t.service.get_state());
}

#[tokio::test]
async fn store_write_failure_returns_500_and_cache_diverges() {
    let t = fresh_app().await;
    t.store.pool().close().await;

    let (status, _, body) = send(&t.app, post_flags(r#"{"state": true}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(std::str::from_utf8(&body).unwrap(), "Database error");

    // Cache already holds the new value while the store kept the old one.
    assert_eq!(current_flags(&t.app).await, json!({ "feature-flag-1": true }));
    let reopened = db::connect(&t.url, RetryPolicy::new(1, Duration::ZERO), 1)
        .await
        .unwrap();
    assert!(!reopened.read_flag(FEATURE_FLAG).await.unwrap());
}

#[tokio::test]
async fn health_reports_ok_without_store() {
    let t = fresh_app().await;
    t.store.pool().close().await;

    let (status, _, body) = send(&t.app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn every_response_carries_cors_headers() {
    let t = fresh_app().await;
    for req in [
        get("/api/flags"),
        get("/api/health"),
        post_flags("garbage"),
        get("/nope"),
    ] {
        let (_, headers, _) = send(&t.app, req).await;
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert_eq!(
            headers.get("access-control-allow-methods").unwrap(),
            "GET, POST, OPTIONS"
        );
        assert_eq!(
            headers.get("access-control-allow-headers").unwrap(),
            "Content-Type"
        );
    }
}

#[tokio::test]
async fn preflight_short_circuits_with_empty_200() {
    let t = fresh_app().await;
    for uri in ["/api/flags", "/api/health", "/anything"] {
        let req = Request::builder()
            .method("OPTIONS")
            .uri(uri)
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let (status, headers, body) = send(&t.app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    }
    assert!(!t.service.get_state());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let t = fresh_app().await;
    let (status, _, _) = send(&t.app, get("/api/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
