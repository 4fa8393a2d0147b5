//! Plan catalog endpoint

use axum::extract::State;
use axum::Json;
use timbila_common::plan::PlanOffer;

use crate::db;
use crate::error::ApiError;
use crate::AppState;

/// GET /api/plans
///
/// The purchasable plan catalog, cheapest first. Public: the checkout UI
/// shows offers before any sign-in.
pub async fn list_plans(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlanOffer>>, ApiError> {
    let offers = db::list_plan_offers(&state.db).await?;
    Ok(Json(offers))
}
