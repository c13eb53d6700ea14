//! Route and store routes.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use database::models::{NewStore, Route, RouteSummary, Store};
use database::{validation, StoreFilter};
use serde::Deserialize;

use crate::error::Result;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct NewRouteRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Body for `POST /tracking/stores/`.
#[derive(Deserialize)]
pub struct NewStoreRequest {
    pub route_id: Option<i64>,
    pub name: String,
    pub manager_name: String,
    pub phone_number: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// `small`, `medium` or `large`
    pub capacity_size: String,
}

impl NewStoreRequest {
    fn into_new_store(self) -> Result<NewStore> {
        Ok(NewStore {
            capacity_size: validation::parse_capacity_size(&self.capacity_size)?,
            route_id: self.route_id,
            name: self.name,
            manager_name: self.manager_name,
            phone_number: self.phone_number,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

/// Query for `/tracking/stores/`.
#[derive(Deserialize)]
pub struct StoreQuery {
    pub route_id: Option<i64>,
    pub approved: Option<bool>,
}

pub async fn list_routes(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<RouteSummary>>> {
    state.caller(&headers).await?;
    let routes = state.workflow.directory.list_routes().await?;
    Ok(Json(routes))
}

pub async fn create_route(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<NewRouteRequest>,
) -> Result<(StatusCode, Json<Route>)> {
    let caller = state.caller(&headers).await?;
    let route = state
        .workflow
        .directory
        .create_route(&caller, &req.name, &req.description)
        .await?;
    Ok((StatusCode::CREATED, Json(route)))
}

pub async fn list_stores(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<StoreQuery>,
) -> Result<Json<Vec<Store>>> {
    state.caller(&headers).await?;
    let filter = StoreFilter {
        route_id: query.route_id,
        approved: query.approved,
    };
    let stores = state.workflow.directory.list_stores(filter).await?;
    Ok(Json(stores))
}

/// Onboard a store. Any `is_approved` key in the body is ignored.
pub async fn create_store(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<NewStoreRequest>,
) -> Result<(StatusCode, Json<Store>)> {
    let caller = state.caller(&headers).await?;
    let new_store = req.into_new_store()?;
    let store = state
        .workflow
        .directory
        .create_store(&caller, &new_store)
        .await?;
    Ok((StatusCode::CREATED, Json(store)))
}
