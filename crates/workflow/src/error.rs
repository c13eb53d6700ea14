//! Error types for workflow operations.

use database::{DatabaseError, ValidationError};
use thiserror::Error;

/// Errors that can occur while handling a caller's action.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// No valid caller identity.
    #[error("authentication required")]
    Unauthenticated,

    /// Caller is authenticated but lacks the manager role.
    #[error("manager role required to {0}")]
    Forbidden(&'static str),

    /// Referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Malformed input.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Request clashes with current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage failure.
    #[error("database error: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for WorkflowError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => WorkflowError::NotFound { entity, id },
            DatabaseError::Validation(err) => WorkflowError::Validation(err),
            err @ (DatabaseError::AlreadyExists { .. } | DatabaseError::Conflict { .. }) => {
                WorkflowError::Conflict(err.to_string())
            }
            err => WorkflowError::Database(err),
        }
    }
}

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_errors_map_to_taxonomy() {
        let err = WorkflowError::from(DatabaseError::NotFound {
            entity: "Store",
            id: "99999".to_string(),
        });
        assert!(matches!(err, WorkflowError::NotFound { entity: "Store", .. }));
        assert_eq!(err.to_string(), "Store not found: 99999");

        let err = WorkflowError::from(DatabaseError::AlreadyExists {
            entity: "User",
            id: "ravi".to_string(),
        });
        assert!(matches!(err, WorkflowError::Conflict(_)));

        let err = WorkflowError::from(DatabaseError::Validation(ValidationError::Empty(
            "reason".to_string(),
        )));
        assert!(matches!(err, WorkflowError::Validation(_)));
    }
}
