//! Database initialization tests
//!
//! Verifies first-run schema creation, plan seeding, idempotent re-init,
//! and shared-secret bootstrap against a throwaway database.

use tempfile::TempDir;
use timbila_common::api::auth::{initialize_shared_secret, load_shared_secret};
use timbila_common::db::{get_setting, init_database, set_setting};

async fn fresh_db() -> (TempDir, sqlx::SqlitePool) {
    let dir = TempDir::new().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("timbila.db"))
        .await
        .expect("Should initialize database");
    (dir, pool)
}

#[tokio::test]
async fn first_run_creates_schema_and_seeds_plans() {
    let (_dir, pool) = fresh_db().await;

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM plans")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);

    let (premium_price,): (i64,) =
        sqlx::query_as("SELECT monthly_price FROM plans WHERE id = 'premium'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(premium_price > 0);
}

#[tokio::test]
async fn reinit_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("timbila.db");

    let pool = init_database(&db_path).await.unwrap();
    drop(pool);

    // Second open must not duplicate seeded rows
    let pool = init_database(&db_path).await.unwrap();
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM plans")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn settings_round_trip() {
    let (_dir, pool) = fresh_db().await;

    assert_eq!(get_setting(&pool, "missing").await.unwrap(), None);

    set_setting(&pool, "greeting", "kanimambo").await.unwrap();
    assert_eq!(
        get_setting(&pool, "greeting").await.unwrap().as_deref(),
        Some("kanimambo")
    );

    set_setting(&pool, "greeting", "obrigado").await.unwrap();
    assert_eq!(
        get_setting(&pool, "greeting").await.unwrap().as_deref(),
        Some("obrigado")
    );
}

#[tokio::test]
async fn shared_secret_generated_once_and_nonzero() {
    let (_dir, pool) = fresh_db().await;

    let first = load_shared_secret(&pool).await.unwrap();
    assert_ne!(first, 0);

    // Stable across reloads
    let second = load_shared_secret(&pool).await.unwrap();
    assert_eq!(first, second);

    // Explicit regeneration replaces it
    let regenerated = initialize_shared_secret(&pool).await.unwrap();
    assert_ne!(regenerated, 0);
    assert_eq!(load_shared_secret(&pool).await.unwrap(), regenerated);
}
