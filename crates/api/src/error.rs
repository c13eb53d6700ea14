//! Error types for the HTTP API.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::ValidationError;
use thiserror::Error;
use tracing::{error, warn};
use workflow::WorkflowError;

/// Errors returned from request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Bad query string or path value.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("unknown approval kind '{0}'")]
    UnknownKind(String),

    /// Request body missing, not JSON, or not the expected shape.
    #[error("invalid request body: {0}")]
    Body(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Workflow(err) => match err {
                WorkflowError::Unauthenticated => StatusCode::UNAUTHORIZED,
                WorkflowError::Forbidden(_) => StatusCode::FORBIDDEN,
                WorkflowError::NotFound { .. } => StatusCode::NOT_FOUND,
                WorkflowError::Validation(_) => StatusCode::BAD_REQUEST,
                WorkflowError::Conflict(_) => StatusCode::CONFLICT,
                WorkflowError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownKind(_) => StatusCode::NOT_FOUND,
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            ApiError::Workflow(WorkflowError::Database(err)) => {
                error!("Database error: {}", err);
                "Internal server error".to_string()
            }
            ApiError::Workflow(WorkflowError::Unauthenticated) => {
                warn!("Unauthenticated request");
                self.to_string()
            }
            other => other.to_string(),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(WorkflowError::Unauthenticated), 401),
            (ApiError::from(WorkflowError::Forbidden("approve stores")), 403),
            (
                ApiError::from(WorkflowError::NotFound {
                    entity: "Store",
                    id: "99999".to_string(),
                }),
                404,
            ),
            (
                ApiError::from(ValidationError::InvalidDate("tomorrow".to_string())),
                400,
            ),
            (ApiError::from(WorkflowError::Conflict("taken".to_string())), 409),
            (ApiError::UnknownKind("route".to_string()), 404),
            (ApiError::Body("expected value".to_string()), 400),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status().as_u16(), expected, "{}", err);
        }
    }
}
