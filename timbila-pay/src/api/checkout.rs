//! Checkout flow endpoints
//!
//! One resource per session; the wizard advances via POSTs against the
//! session id. Every response carries the same session view so the
//! presentation layer can render whatever step it lands on.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use timbila_common::plan::PlanOffer;
use timbila_common::{Centavos, Error, PaymentMethodId, PlanId};
use tracing::info;
use uuid::Uuid;

use crate::checkout::{CheckoutSession, CheckoutStep, PaymentDetails};
use crate::db;
use crate::error::{PayError, Result};
use crate::AppState;

/// What the presentation layer sees of a session
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub step: CheckoutStep,
    pub plan: PlanOffer,
    pub method: Option<PaymentMethodId>,
    /// Surcharge for the selected method; absent until one is chosen
    pub fee: Option<Centavos>,
    /// Total due; absent until a method is chosen
    pub total: Option<Centavos>,
    pub transaction_ref: Option<String>,
    pub failure_reason: Option<String>,
}

fn session_view(session: &CheckoutSession) -> Result<SessionView> {
    Ok(SessionView {
        id: session.id,
        step: session.step,
        plan: session.plan.clone(),
        method: session.method,
        fee: session.fee()?,
        total: session.total()?,
        transaction_ref: session.transaction_ref.clone(),
        failure_reason: session.failure_reason.clone(),
    })
}

/// POST /api/checkout request body (auth fields ignored here)
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    pub plan: String,
}

/// POST /api/checkout
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateCheckoutRequest>,
) -> Result<(StatusCode, Json<SessionView>)> {
    let plan_id: PlanId = req.plan.parse().map_err(PayError::Common)?;
    let offer = db::fetch_plan_offer(&state.db, plan_id)
        .await
        .map_err(PayError::Common)?
        .ok_or_else(|| PayError::Common(Error::NotFound(format!("Plan {}", plan_id))))?;

    let session = CheckoutSession::new(offer);
    let view = session_view(&session)?;
    info!("Checkout started: session={} plan={}", session.id, plan_id);
    state.sessions.insert(session).await;

    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/checkout/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let session = state.sessions.get(id).await?;
    Ok(Json(session_view(&session)?))
}

/// POST /api/checkout/:id/method request body
#[derive(Debug, Deserialize)]
pub struct SelectMethodRequest {
    pub method: String,
}

/// POST /api/checkout/:id/method
pub async fn select_method(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectMethodRequest>,
) -> Result<Json<SessionView>> {
    let method: PaymentMethodId = req.method.parse().map_err(PayError::Common)?;
    let session = state
        .sessions
        .with_session(id, |s| {
            s.select_method(method)?;
            Ok(s.clone())
        })
        .await?;
    Ok(Json(session_view(&session)?))
}

/// POST /api/checkout/:id/details request body
#[derive(Debug, Deserialize)]
pub struct SubmitDetailsRequest {
    pub details: PaymentDetails,
}

/// POST /api/checkout/:id/details
pub async fn submit_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitDetailsRequest>,
) -> Result<Json<SessionView>> {
    let session = state
        .sessions
        .with_session(id, |s| {
            s.submit(req.details)?;
            Ok(s.clone())
        })
        .await?;
    Ok(Json(session_view(&session)?))
}

/// POST /api/checkout/:id/back
pub async fn go_back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let session = state
        .sessions
        .with_session(id, |s| {
            s.back()?;
            Ok(s.clone())
        })
        .await?;
    Ok(Json(session_view(&session)?))
}

/// POST /api/checkout/:id/confirm
///
/// Advances to processing, hands the session to the payment gateway, and
/// records the verdict. The response session is terminal: done with a
/// transaction reference, or failed with the gateway's reason.
pub async fn confirm_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    // confirmation -> processing under the lock, then the gateway call
    // runs on a snapshot; the session is single-owner so nothing else
    // mutates it meanwhile
    let snapshot = state
        .sessions
        .with_session(id, |s| {
            s.confirm()?;
            Ok(s.clone())
        })
        .await?;

    let outcome = state.gateway.submit_payment(&snapshot).await;

    let session = state
        .sessions
        .with_session(id, |s| {
            s.complete(outcome)?;
            Ok(s.clone())
        })
        .await?;

    match session.step {
        CheckoutStep::Done => info!(
            "Checkout settled: session={} ref={}",
            session.id,
            session.transaction_ref.as_deref().unwrap_or("-")
        ),
        _ => info!(
            "Checkout failed: session={} reason={}",
            session.id,
            session.failure_reason.as_deref().unwrap_or("-")
        ),
    }

    Ok(Json(session_view(&session)?))
}

/// DELETE /api/checkout/:id
///
/// Cancel/discard a session at any step; terminal sessions are cleaned
/// up the same way.
pub async fn cancel_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let session = state.sessions.remove(id).await?;
    info!("Checkout discarded: session={} step={}", session.id, session.step);
    Ok(StatusCode::NO_CONTENT)
}
