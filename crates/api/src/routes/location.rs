//! Location ping routes.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use database::models::LocationPing;
use serde::Deserialize;

use crate::error::Result;
use crate::extract::JsonBody;
use crate::state::AppState;

/// A GPS sample from the device.
#[derive(Deserialize)]
pub struct PingRequest {
    pub latitude: f64,
    pub longitude: f64,
}

pub async fn record_ping(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<PingRequest>,
) -> Result<(StatusCode, Json<LocationPing>)> {
    let caller = state.caller(&headers).await?;
    let ping = state
        .workflow
        .locations
        .record_ping(&caller, req.latitude, req.longitude)
        .await?;
    Ok((StatusCode::CREATED, Json(ping)))
}

/// The caller's own latest ping.
pub async fn latest_own(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LocationPing>> {
    let caller = state.caller(&headers).await?;
    let ping = state.workflow.locations.latest_ping(&caller, None).await?;
    Ok(Json(ping))
}

/// Another user's latest ping.
pub async fn latest_for(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Result<Json<LocationPing>> {
    let caller = state.caller(&headers).await?;
    let ping = state
        .workflow
        .locations
        .latest_ping(&caller, Some(user_id))
        .await?;
    Ok(Json(ping))
}

pub async fn latest_per_agent(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<LocationPing>>> {
    state.caller(&headers).await?;
    let pings = state.workflow.locations.latest_per_agent().await?;
    Ok(Json(pings))
}
