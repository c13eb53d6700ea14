//! Notification routes.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use database::models::Notification;
use serde::Deserialize;

use crate::error::Result;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SendRequest {
    pub title: String,
    pub message: String,
}

pub async fn send(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<SendRequest>,
) -> Result<(StatusCode, Json<Notification>)> {
    let caller = state.caller(&headers).await?;
    let posted = state
        .workflow
        .notifications
        .send(&caller, &req.title, &req.message)
        .await?;
    Ok((StatusCode::CREATED, Json(posted)))
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Notification>>> {
    state.caller(&headers).await?;
    let notifications = state.workflow.notifications.list().await?;
    Ok(Json(notifications))
}
