//! timbila-pay (Checkout) - Plan purchase flow
//!
//! Drives the checkout wizard (method selection, details entry,
//! confirmation) and computes fees and totals per payment method.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use timbila_common::api::auth::load_shared_secret;
use timbila_common::config::{database_path, ensure_root_folder, resolve_root_folder};
use timbila_common::db::init_database;
use timbila_pay::gateway::InProcessGateway;
use timbila_pay::{build_router, AppState};

/// Checkout service for Timbila
#[derive(Debug, Parser)]
#[command(name = "timbila-pay", version)]
struct Args {
    /// Root folder holding the database (overrides TIMBILA_ROOT and config)
    #[arg(long)]
    root_folder: Option<String>,

    /// Port to listen on
    #[arg(long, default_value_t = 5811)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Timbila Checkout (timbila-pay) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), "TIMBILA_ROOT")?;
    ensure_root_folder(&root_folder)?;

    let db_path = database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e.into());
        }
    };

    let shared_secret = match load_shared_secret(&pool).await {
        Ok(secret) => {
            if secret == 0 {
                info!("API authentication disabled (shared_secret = 0)");
            } else {
                info!("Loaded shared secret for API authentication");
            }
            secret
        }
        Err(e) => {
            error!("Failed to load shared secret: {}", e);
            return Err(e.into());
        }
    };

    let state = AppState::new(pool, shared_secret, Arc::new(InProcessGateway));
    let app = build_router(state);

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("timbila-pay listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
