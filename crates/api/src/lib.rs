//! HTTP API for the field workforce tracker.
//!
//! A thin axum adapter over the [`workflow`] crate. Callers are identified by
//! the `X-User-Id` header, which an authenticating gateway in front of this
//! service sets; see [`state::CALLER_HEADER`].

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use config::{Config, ConfigError};
pub use error::{ApiError, Result};
pub use extract::JsonBody;
pub use state::AppState;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the application router with request tracing.
pub fn build_router(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
