//! Integration tests for timbila-gate API endpoints
//!
//! Tests cover:
//! - Health endpoint (no auth required)
//! - Plan catalog listing
//! - Access checks across tiers, anonymous viewers, and inactive
//!   subscriptions
//! - Authentication middleware rejection paths

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method
use timbila_common::db::init_database;
use timbila_gate::{build_router, AppState};

/// Test helper: fresh database with a few collaborator-written rows
async fn setup_test_db() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("timbila.db"))
        .await
        .expect("Should initialize database");

    for (user, tier, active, expires) in [
        ("ana", "premium", 1, None),
        ("bento", "vip", 1, None),
        ("carla", "vip", 0, None), // lapsed
        ("dina", "vip", 1, Some("2020-01-01T00:00:00Z")), // expired
    ] {
        sqlx::query(
            "INSERT INTO subscriptions (user_id, tier, active, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user)
        .bind(tier)
        .bind(active)
        .bind(expires)
        .execute(&pool)
        .await
        .unwrap();
    }

    for (id, kind, tier) in [
        ("post-public", "post", "free"),
        ("post-premium", "post", "premium"),
        ("event-vip", "event", "vip"),
    ] {
        sqlx::query("INSERT INTO resources (resource_id, kind, required_tier) VALUES (?, ?, ?)")
            .bind(id)
            .bind(kind)
            .bind(tier)
            .execute(&pool)
            .await
            .unwrap();
    }

    (dir, pool)
}

/// Test helper: app with auth disabled (shared_secret = 0)
fn setup_app(db: SqlitePool) -> axum::Router {
    build_router(AppState::new(db, 0))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn check(app: axum::Router, user_id: Option<&str>, resource_id: &str) -> Value {
    let body = match user_id {
        Some(u) => json!({ "user_id": u, "resource_id": resource_id }),
        None => json!({ "resource_id": resource_id }),
    };
    let response = app
        .oneshot(post_json("/api/access/check", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    extract_json(response.into_body()).await
}

#[tokio::test]
async fn test_health_endpoint_no_auth_required() {
    let (_dir, db) = setup_test_db().await;
    let app = setup_app(db);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "timbila-gate");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_plan_catalog_listing() {
    let (_dir, db) = setup_test_db().await;
    let app = setup_app(db);

    let request = Request::builder()
        .method("GET")
        .uri("/api/plans")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    let offers = body.as_array().unwrap();
    assert_eq!(offers.len(), 2);
    // Cheapest first
    assert_eq!(offers[0]["id"], "premium");
    assert_eq!(offers[1]["id"], "vip");
    assert!(offers[0]["monthly_price"].as_i64().unwrap() < offers[1]["monthly_price"].as_i64().unwrap());
}

#[tokio::test]
async fn test_free_resource_open_to_everyone() {
    let (_dir, db) = setup_test_db().await;

    let body = check(setup_app(db.clone()), None, "post-public").await;
    assert_eq!(body["allowed"], true);
    assert_eq!(body["required_tier"], "free");
    assert_eq!(body["exclusive"], false);

    // Lapsed subscriber still sees public content
    let body = check(setup_app(db), Some("carla"), "post-public").await;
    assert_eq!(body["allowed"], true);
}

#[tokio::test]
async fn test_premium_viewer_against_vip_event() {
    let (_dir, db) = setup_test_db().await;

    let body = check(setup_app(db.clone()), Some("ana"), "event-vip").await;
    assert_eq!(body["allowed"], false);
    assert_eq!(body["viewer_tier"], "premium");
    assert_eq!(body["required_tier"], "vip");
    assert_eq!(body["exclusive"], true);
    assert_eq!(body["resource_kind"], "event");

    let body = check(setup_app(db), Some("bento"), "event-vip").await;
    assert_eq!(body["allowed"], true);
    assert_eq!(body["viewer_tier"], "vip");
}

#[tokio::test]
async fn test_inactive_and_expired_subscriptions_denied() {
    let (_dir, db) = setup_test_db().await;

    // active=0, stored tier vip: effective tier free
    let body = check(setup_app(db.clone()), Some("carla"), "post-premium").await;
    assert_eq!(body["allowed"], false);
    assert_eq!(body["viewer_tier"], "free");

    // expires_at in the past
    let body = check(setup_app(db), Some("dina"), "event-vip").await;
    assert_eq!(body["allowed"], false);
    assert_eq!(body["viewer_tier"], "free");
}

#[tokio::test]
async fn test_anonymous_viewer_denied_gated_content() {
    let (_dir, db) = setup_test_db().await;

    let body = check(setup_app(db), None, "post-premium").await;
    assert_eq!(body["allowed"], false);
    assert_eq!(body["viewer_tier"], "free");
}

#[tokio::test]
async fn test_unknown_resource_is_404() {
    let (_dir, db) = setup_test_db().await;
    let app = setup_app(db);

    let response = app
        .oneshot(post_json(
            "/api/access/check",
            json!({ "resource_id": "no-such-thing" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_auth_required_when_secret_set() {
    let (_dir, db) = setup_test_db().await;
    let secret = 42_i64;
    let app = build_router(AppState::new(db, secret));

    // Missing timestamp/hash fields
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/access/check",
            json!({ "resource_id": "post-public" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Correctly signed request passes
    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64;
    let mut body = json!({
        "resource_id": "post-public",
        "timestamp": now_ms,
        "hash": "dummy"
    });
    let hash = timbila_common::api::auth::calculate_hash(&body, secret);
    body["hash"] = Value::String(hash);

    let response = app
        .oneshot(post_json("/api/access/check", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
