//! Employee accounts.

use chrono::Utc;
use database::models::{NewUser, User};
use database::validation::{self, MAX_NAME_LENGTH};
use database::{user, Database, DatabaseError};
use tracing::info;

use crate::error::{Result, WorkflowError};
use crate::identity::Caller;

#[derive(Debug, Clone)]
pub struct EmployeeDirectory {
    db: Database,
}

impl EmployeeDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create an employee. A taken username is a conflict.
    pub async fn create(&self, caller: &Caller, new_user: &NewUser) -> Result<User> {
        caller.require_manager("create employees")?;
        self.insert(new_user).await
    }

    /// Every employee.
    pub async fn list(&self, caller: &Caller) -> Result<Vec<User>> {
        caller.require_manager("list employees")?;
        Ok(user::list_users(self.db.pool()).await?)
    }

    /// Make sure a manager account named `username` exists, creating it if
    /// needed. Used at startup so a fresh database has someone who can
    /// create the rest of the staff.
    pub async fn ensure_manager(&self, username: &str) -> Result<User> {
        match user::get_user_by_username(self.db.pool(), username.trim()).await {
            Ok(existing) if existing.is_manager => Ok(existing),
            Ok(existing) => Err(WorkflowError::Conflict(format!(
                "user '{}' exists but is not a manager",
                existing.username
            ))),
            Err(DatabaseError::NotFound { .. }) => {
                self.insert(&NewUser {
                    username: username.to_string(),
                    first_name: String::new(),
                    last_name: String::new(),
                    is_manager: true,
                })
                .await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn insert(&self, new_user: &NewUser) -> Result<User> {
        validation::validate_username(&new_user.username)?;
        validation::validate_length("first name", &new_user.first_name, MAX_NAME_LENGTH)?;
        validation::validate_length("last name", &new_user.last_name, MAX_NAME_LENGTH)?;

        let created = user::create_user(self.db.pool(), new_user, Utc::now()).await?;
        info!(
            user_id = created.id,
            username = %created.username,
            is_manager = created.is_manager,
            "Employee created"
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_user, test_db};

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            first_name: "Ravi".to_string(),
            last_name: "Kumar".to_string(),
            is_manager: false,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let db = test_db().await;
        let manager = Caller::manager(seed_user(&db, "priya", true).await.id);
        let employees = EmployeeDirectory::new(db);

        let created = employees.create(&manager, &new_user("ravi")).await.unwrap();
        assert!(!created.is_manager);

        let result = employees.create(&manager, &new_user("ravi")).await;
        assert!(matches!(result, Err(WorkflowError::Conflict(_))));

        let result = employees.create(&manager, &new_user("ravi kumar")).await;
        assert!(matches!(result, Err(WorkflowError::Validation(_))));

        let result = employees.create(&Caller::agent(created.id), &new_user("anita")).await;
        assert!(matches!(result, Err(WorkflowError::Forbidden(_))));

        let all = employees.list(&manager).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_ensure_manager() {
        let db = test_db().await;
        seed_user(&db, "ravi", false).await;
        let employees = EmployeeDirectory::new(db);

        let first = employees.ensure_manager("admin").await.unwrap();
        assert!(first.is_manager);
        let again = employees.ensure_manager("admin").await.unwrap();
        assert_eq!(again.id, first.id);

        let result = employees.ensure_manager("ravi").await;
        assert!(matches!(result, Err(WorkflowError::Conflict(_))));
    }
}
