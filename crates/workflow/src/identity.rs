//! Caller identity and role checks.

use async_trait::async_trait;
use database::{user, Database, DatabaseError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, WorkflowError};
use crate::scope::Scope;

/// The authenticated identity behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: i64,
    pub is_manager: bool,
}

impl Caller {
    pub fn agent(user_id: i64) -> Self {
        Self {
            user_id,
            is_manager: false,
        }
    }

    pub fn manager(user_id: i64) -> Self {
        Self {
            user_id,
            is_manager: true,
        }
    }

    /// Fail with [`WorkflowError::Forbidden`] unless the caller is a manager.
    ///
    /// `action` completes the sentence "manager role required to ...".
    pub fn require_manager(&self, action: &'static str) -> Result<()> {
        if self.is_manager {
            Ok(())
        } else {
            Err(WorkflowError::Forbidden(action))
        }
    }

    /// Rows this caller may read.
    pub fn scope(&self) -> Scope {
        if self.is_manager {
            Scope::All
        } else {
            Scope::Own(self.user_id)
        }
    }
}

/// Resolves a request credential to a [`Caller`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `None` means the request carried no credential.
    async fn resolve(&self, credential: Option<&str>) -> Result<Caller>;
}

/// Treats the credential as a user id asserted by an upstream gateway and
/// loads the role from the `users` table.
#[derive(Debug, Clone)]
pub struct DatabaseIdentity {
    db: Database,
}

impl DatabaseIdentity {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityProvider for DatabaseIdentity {
    async fn resolve(&self, credential: Option<&str>) -> Result<Caller> {
        let Some(raw) = credential.map(str::trim).filter(|c| !c.is_empty()) else {
            return Err(WorkflowError::Unauthenticated);
        };

        let user_id: i64 = raw.parse().map_err(|_| {
            debug!(credential = raw, "Malformed caller id");
            WorkflowError::Unauthenticated
        })?;

        match user::get_user(self.db.pool(), user_id).await {
            Ok(found) => Ok(Caller {
                user_id: found.id,
                is_manager: found.is_manager,
            }),
            Err(DatabaseError::NotFound { .. }) => {
                debug!(user_id, "Unknown caller id");
                Err(WorkflowError::Unauthenticated)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_user, test_db};

    #[tokio::test]
    async fn test_resolve_known_user_carries_role() {
        let db = test_db().await;
        let manager = seed_user(&db, "priya", true).await;
        let agent = seed_user(&db, "ravi", false).await;
        let identity = DatabaseIdentity::new(db);

        let caller = identity
            .resolve(Some(&manager.id.to_string()))
            .await
            .unwrap();
        assert_eq!(caller, Caller::manager(manager.id));

        let caller = identity
            .resolve(Some(&format!(" {} ", agent.id)))
            .await
            .unwrap();
        assert_eq!(caller, Caller::agent(agent.id));
    }

    #[tokio::test]
    async fn test_resolve_rejects_missing_malformed_and_unknown() {
        let db = test_db().await;
        let identity = DatabaseIdentity::new(db);

        for credential in [None, Some(""), Some("abc"), Some("4242")] {
            let result = identity.resolve(credential).await;
            assert!(
                matches!(result, Err(WorkflowError::Unauthenticated)),
                "credential {:?}",
                credential
            );
        }
    }

    #[test]
    fn test_require_manager() {
        assert!(Caller::manager(1).require_manager("approve stores").is_ok());

        let err = Caller::agent(2).require_manager("approve stores").unwrap_err();
        assert_eq!(err.to_string(), "manager role required to approve stores");
    }
}
