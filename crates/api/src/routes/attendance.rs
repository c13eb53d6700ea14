//! Attendance routes.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use database::models::AttendanceRecord;
use database::validation;
use serde::Deserialize;

use crate::error::Result;
use crate::extract::JsonBody;
use crate::state::AppState;

/// A punch-in with the photo already uploaded to blob storage.
#[derive(Deserialize)]
pub struct PunchRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Blob storage reference for the geotagged photo.
    pub photo: String,
}

/// Query for `/tracking/staff-attendance/`.
#[derive(Deserialize)]
pub struct StaffAttendanceQuery {
    pub user_id: i64,
    /// `YYYY-MM`
    pub month: Option<String>,
}

pub async fn punch_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<PunchRequest>,
) -> Result<(StatusCode, Json<AttendanceRecord>)> {
    let caller = state.caller(&headers).await?;
    let record = state
        .workflow
        .attendance
        .punch_in(&caller, req.latitude, req.longitude, &req.photo)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_own(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<AttendanceRecord>>> {
    let caller = state.caller(&headers).await?;
    let records = state.workflow.attendance.list_own(&caller).await?;
    Ok(Json(records))
}

pub async fn list_for(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<StaffAttendanceQuery>,
) -> Result<Json<Vec<AttendanceRecord>>> {
    let caller = state.caller(&headers).await?;
    let month = query
        .month
        .as_deref()
        .map(validation::parse_month)
        .transpose()?;

    let records = state
        .workflow
        .attendance
        .list_for(&caller, query.user_id, month)
        .await?;
    Ok(Json(records))
}
