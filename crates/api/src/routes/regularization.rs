//! Regularization request routes.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use database::models::RegularizationRequest;
use database::validation;
use serde::Deserialize;

use crate::error::Result;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegularizationForm {
    /// `YYYY-MM-DD`
    pub date: String,
    pub reason: String,
}

#[derive(Deserialize)]
pub struct RegularizationQuery {
    pub user: Option<i64>,
    pub status: Option<String>,
}

pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(form): JsonBody<RegularizationForm>,
) -> Result<(StatusCode, Json<RegularizationRequest>)> {
    let caller = state.caller(&headers).await?;
    let date = validation::parse_date(&form.date)?;
    let request = state
        .workflow
        .regularizations
        .submit(&caller, date, &form.reason)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RegularizationQuery>,
) -> Result<Json<Vec<RegularizationRequest>>> {
    let caller = state.caller(&headers).await?;
    let status = query
        .status
        .as_deref()
        .map(validation::parse_status)
        .transpose()?;

    let requests = state
        .workflow
        .regularizations
        .list(&caller, query.user, status)
        .await?;
    Ok(Json(requests))
}
