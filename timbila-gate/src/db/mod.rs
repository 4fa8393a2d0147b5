//! Database access layer for timbila-gate
//!
//! The single normalization boundary between raw rows written by external
//! collaborators and the internal entities the evaluator works with. All
//! row-to-entity mapping happens here, including the fail-closed tier
//! parse; nothing else in the service touches raw tier strings.

use crate::access::{AccessRequirement, ViewerSubscription};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use timbila_common::plan::PlanOffer;
use timbila_common::{Result, Tier};

/// A gated resource as stored by the content collaborator
#[derive(Debug, Clone)]
pub struct GatedResource {
    pub resource_id: String,
    /// Resource kind: post, event, gallery, members
    pub kind: String,
    pub requirement: AccessRequirement,
}

/// Fetch a viewer's subscription; `None` is an anonymous viewer
pub async fn fetch_viewer_subscription(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<ViewerSubscription>> {
    let row: Option<(String, i64, Option<String>)> = sqlx::query_as(
        "SELECT tier, active, expires_at FROM subscriptions WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(tier, active, expires_at)| ViewerSubscription {
        tier: Tier::from_db_value(&tier),
        active: active != 0,
        expires_at: expires_at.as_deref().and_then(parse_timestamp),
    }))
}

/// Fetch a resource and its access requirement
pub async fn fetch_resource(
    pool: &SqlitePool,
    resource_id: &str,
) -> Result<Option<GatedResource>> {
    let row: Option<(String, String, String)> = sqlx::query_as(
        "SELECT resource_id, kind, required_tier FROM resources WHERE resource_id = ?",
    )
    .bind(resource_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(resource_id, kind, required_tier)| GatedResource {
        resource_id,
        kind,
        requirement: AccessRequirement::new(Tier::from_db_value(&required_tier)),
    }))
}

/// List the seeded plan catalog, cheapest first
pub async fn list_plan_offers(pool: &SqlitePool) -> Result<Vec<PlanOffer>> {
    let rows: Vec<(String, String, i64, String)> = sqlx::query_as(
        "SELECT id, display_name, monthly_price, description
         FROM plans ORDER BY monthly_price ASC",
    )
    .fetch_all(pool)
    .await?;

    let mut offers = Vec::with_capacity(rows.len());
    for (id, display_name, monthly_price, description) in rows {
        // Unknown plan ids would mean collaborator schema drift; skip them
        // rather than failing the whole catalog
        if let Ok(id) = id.parse() {
            offers.push(PlanOffer {
                id,
                display_name,
                monthly_price,
                description,
            });
        }
    }
    Ok(offers)
}

/// Parse a collaborator-written RFC 3339 timestamp; invalid values are
/// dropped (treated as no expiry recorded)
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
