//! Access-check endpoint
//!
//! The presentation layer asks "may this viewer see this resource" before
//! rendering gated vs full content. The decision itself is the pure
//! evaluator in [`crate::access`]; this handler only fetches the two
//! inputs and reports the verdict.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use timbila_common::{Error, Tier};
use tracing::debug;

use crate::access::can_access;
use crate::db;
use crate::error::ApiError;
use crate::AppState;

/// POST /api/access/check request body
///
/// `user_id` absent means an anonymous viewer. Auth fields (timestamp,
/// hash) are consumed by the middleware and ignored here.
#[derive(Debug, Deserialize)]
pub struct CheckAccessRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    pub resource_id: String,
}

/// POST /api/access/check response body
#[derive(Debug, Serialize)]
pub struct CheckAccessResponse {
    pub allowed: bool,
    pub resource_kind: String,
    pub required_tier: Tier,
    /// Tier the viewer effectively holds (free for anonymous, inactive,
    /// or expired)
    pub viewer_tier: Tier,
    /// Derived flag: the resource requires more than free tier
    pub exclusive: bool,
}

/// POST /api/access/check
pub async fn check_access(
    State(state): State<AppState>,
    Json(req): Json<CheckAccessRequest>,
) -> Result<Json<CheckAccessResponse>, ApiError> {
    let resource = db::fetch_resource(&state.db, &req.resource_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Resource {}", req.resource_id)))?;

    let viewer = match &req.user_id {
        Some(user_id) => db::fetch_viewer_subscription(&state.db, user_id).await?,
        None => None,
    };

    let now = Utc::now();
    let viewer_tier = viewer
        .as_ref()
        .map(|sub| sub.effective_tier(now))
        .unwrap_or(Tier::Free);
    let allowed = can_access(viewer.as_ref(), &resource.requirement, now);

    debug!(
        "Access check: resource={} kind={} required={} viewer={} allowed={}",
        resource.resource_id, resource.kind, resource.requirement.required_tier, viewer_tier, allowed
    );

    Ok(Json(CheckAccessResponse {
        allowed,
        resource_kind: resource.kind,
        required_tier: resource.requirement.required_tier,
        viewer_tier,
        exclusive: resource.requirement.is_exclusive(),
    }))
}
