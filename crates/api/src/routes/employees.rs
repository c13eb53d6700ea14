//! Employee routes.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use database::models::{NewUser, User};

use crate::error::Result;
use crate::extract::JsonBody;
use crate::state::AppState;

pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<NewUser>,
) -> Result<(StatusCode, Json<User>)> {
    let caller = state.caller(&headers).await?;
    let user = state.workflow.employees.create(&caller, &req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Vec<User>>> {
    let caller = state.caller(&headers).await?;
    let users = state.workflow.employees.list(&caller).await?;
    Ok(Json(users))
}
