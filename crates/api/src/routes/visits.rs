//! Store visit routes.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use database::models::StoreVisit;
use serde::Deserialize;

use crate::error::Result;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct VisitRequest {
    pub store_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub photo: String,
}

pub async fn record_visit(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<VisitRequest>,
) -> Result<(StatusCode, Json<StoreVisit>)> {
    let caller = state.caller(&headers).await?;
    let visit = state
        .workflow
        .visits
        .record_visit(&caller, req.store_id, req.latitude, req.longitude, &req.photo)
        .await?;
    Ok((StatusCode::CREATED, Json(visit)))
}

pub async fn list_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<StoreVisit>>> {
    let caller = state.caller(&headers).await?;
    let visits = state.workflow.visits.list_all(&caller).await?;
    Ok(Json(visits))
}
