//! Route handlers for the HTTP API.
//!
//! Paths keep the trailing-slash layout the mobile clients already call.

pub mod approvals;
pub mod assignments;
pub mod attendance;
pub mod directory;
pub mod employees;
pub mod health;
pub mod location;
pub mod notifications;
pub mod regularization;
pub mod visits;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // Location
        .route("/tracking/update/", post(location::record_ping))
        .route("/tracking/latest/", get(location::latest_own))
        .route("/tracking/:user_id/latest/", get(location::latest_for))
        .route("/tracking/all/", get(location::latest_per_agent))
        // Attendance
        .route("/tracking/punch/", post(attendance::punch_in))
        .route("/tracking/my-attendance/", get(attendance::list_own))
        .route("/tracking/staff-attendance/", get(attendance::list_for))
        // Routes and stores
        .route(
            "/tracking/routes/",
            get(directory::list_routes).post(directory::create_route),
        )
        .route(
            "/tracking/stores/",
            get(directory::list_stores).post(directory::create_store),
        )
        .route(
            "/tracking/store-visit/",
            get(visits::list_all).post(visits::record_visit),
        )
        // Regularization and assignments
        .route(
            "/tracking/regularization/",
            get(regularization::list).post(regularization::submit),
        )
        .route(
            "/tracking/assignments/",
            get(assignments::list).post(assignments::assign),
        )
        // Manager approvals
        .route("/tracking/manager/pending/", get(approvals::pending))
        .route(
            "/tracking/manager/approve/:kind/:id/",
            post(approvals::approve).put(approvals::approve),
        )
        .route(
            "/tracking/manager/reject/regularization/:id/",
            post(approvals::reject_regularization),
        )
        // Notifications
        .route(
            "/tracking/notifications/",
            get(notifications::list).post(notifications::send),
        )
        // Employees
        .route("/users/create/", post(employees::create))
        .route("/users/list/", get(employees::list))
}
