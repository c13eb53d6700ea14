//! Route assignment routes.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use database::models::RouteAssignment;
use database::{validation, AssignmentFilter, AssignmentOutcome};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AssignRequest {
    pub user: i64,
    pub route: i64,
    /// `YYYY-MM-DD`
    pub date: String,
}

#[derive(Deserialize)]
pub struct AssignmentQuery {
    pub user: Option<i64>,
    pub date: Option<String>,
}

/// An assignment plus whether the call created or replaced it.
#[derive(Serialize)]
pub struct AssignResponse {
    #[serde(flatten)]
    pub assignment: RouteAssignment,
    pub outcome: AssignmentOutcome,
}

/// Create or replace the assignment for a user and day.
///
/// Responds `201 Created` for a new row and `200 OK` when an existing
/// assignment was replaced.
pub async fn assign(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<AssignRequest>,
) -> Result<(StatusCode, Json<AssignResponse>)> {
    let caller = state.caller(&headers).await?;
    let date = validation::parse_date(&req.date)?;

    let (assignment, outcome) = state
        .workflow
        .assignments
        .assign(&caller, req.user, req.route, date)
        .await?;

    let status = match outcome {
        AssignmentOutcome::Created => StatusCode::CREATED,
        AssignmentOutcome::Updated => StatusCode::OK,
    };
    Ok((status, Json(AssignResponse { assignment, outcome })))
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AssignmentQuery>,
) -> Result<Json<Vec<RouteAssignment>>> {
    let caller = state.caller(&headers).await?;
    let date = query
        .date
        .as_deref()
        .map(validation::parse_date)
        .transpose()?;

    let filter = AssignmentFilter {
        user_id: query.user,
        date,
    };
    let assignments = state.workflow.assignments.list(&caller, filter).await?;
    Ok(Json(assignments))
}
