//! Database initialization shared by the Timbila services
//!
//! The database is created on first run with the full schema and a seeded
//! plan catalog, so a fresh install starts without manual setup. The
//! subscription and resource tables are written by external collaborators
//! (billing and content services) and are read-only to this core.

use crate::plan::default_plan_offers;
use crate::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Enable foreign keys
    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers while a collaborator writes
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;
    seed_plans(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent - safe to call multiple times)
async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    // Written by the billing collaborator; read-only to this core
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS subscriptions (
            user_id TEXT PRIMARY KEY,
            tier TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 0,
            expires_at TEXT
        )",
    )
    .execute(pool)
    .await?;

    // Written by the content collaborator; read-only to this core
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS resources (
            resource_id TEXT PRIMARY KEY,
            kind TEXT NOT NULL,
            required_tier TEXT NOT NULL DEFAULT 'free'
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS plans (
            id TEXT PRIMARY KEY,
            display_name TEXT NOT NULL,
            monthly_price INTEGER NOT NULL,
            description TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Seed the plan catalog on first run (no-op when offers already present)
async fn seed_plans(pool: &SqlitePool) -> Result<()> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM plans")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    for offer in default_plan_offers() {
        sqlx::query(
            "INSERT INTO plans (id, display_name, monthly_price, description)
             VALUES (?, ?, ?, ?)",
        )
        .bind(offer.id.as_str())
        .bind(&offer.display_name)
        .bind(offer.monthly_price)
        .bind(&offer.description)
        .execute(pool)
        .await?;
    }

    info!("Seeded plan catalog");
    Ok(())
}

/// Read a value from the settings table
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(v,)| v))
}

/// Write a value into the settings table (insert or replace)
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES (?, ?)")
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;
    Ok(())
}
