//! Database access for timbila-pay
//!
//! Checkout only reads the seeded plan catalog; sessions themselves are
//! never persisted.

use sqlx::SqlitePool;
use timbila_common::plan::PlanOffer;
use timbila_common::{PlanId, Result};

/// Fetch one plan offer by id
pub async fn fetch_plan_offer(pool: &SqlitePool, id: PlanId) -> Result<Option<PlanOffer>> {
    let row: Option<(String, i64, String)> = sqlx::query_as(
        "SELECT display_name, monthly_price, description FROM plans WHERE id = ?",
    )
    .bind(id.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|(display_name, monthly_price, description)| PlanOffer {
        id,
        display_name,
        monthly_price,
        description,
    }))
}
