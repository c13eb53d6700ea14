//! Manager approval routes.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use database::models::{PendingApprovals, RegularizationRequest};
use database::{Approval, ApprovalKind};
use workflow::Approved;

use crate::error::{ApiError, Result};
use crate::state::AppState;

/// Everything awaiting a decision.
pub async fn pending(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PendingApprovals>> {
    let caller = state.caller(&headers).await?;
    let pending = state.workflow.approvals.list_pending(&caller).await?;
    Ok(Json(pending))
}

/// Approve a store, visit or regularization.
pub async fn approve(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<Json<Approved>> {
    let caller = state.caller(&headers).await?;
    let kind: ApprovalKind = kind.parse().map_err(|_| ApiError::UnknownKind(kind))?;
    let approved = state.workflow.approvals.approve(&caller, kind, id).await?;
    Ok(Json(approved))
}

pub async fn reject_regularization(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Approval<RegularizationRequest>>> {
    let caller = state.caller(&headers).await?;
    let rejected = state
        .workflow
        .approvals
        .reject_regularization(&caller, id)
        .await?;
    Ok(Json(rejected))
}
