//! Application state shared across handlers.

use std::sync::Arc;

use axum::http::HeaderMap;
use database::Database;
use workflow::{Caller, DatabaseIdentity, IdentityProvider, Workflow};

use crate::error::Result;

/// Header carrying the caller's user id, set by the authenticating gateway.
pub const CALLER_HEADER: &str = "x-user-id";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub workflow: Workflow,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// State backed by `db`, with callers resolved against the `users` table.
    pub fn new(db: Database) -> Self {
        Self {
            workflow: Workflow::new(db.clone()),
            identity: Arc::new(DatabaseIdentity::new(db)),
        }
    }

    /// Resolve the caller from request headers.
    pub async fn caller(&self, headers: &HeaderMap) -> Result<Caller> {
        let credential = headers
            .get(CALLER_HEADER)
            .and_then(|value| value.to_str().ok());

        Ok(self.identity.resolve(credential).await?)
    }
}
