//! Employee CRUD operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{NewUser, User};

/// Create a new employee.
pub async fn create_user(
    pool: &SqlitePool,
    user: &NewUser,
    created_at: DateTime<Utc>,
) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, first_name, last_name, is_manager, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, username, first_name, last_name, is_manager, created_at
        "#,
    )
    .bind(user.username.trim())
    .bind(user.first_name.trim())
    .bind(user.last_name.trim())
    .bind(user.is_manager)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: user.username.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })
}

/// Get an employee by ID.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, first_name, last_name, is_manager, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("User", id))
}

/// Get an employee by username.
pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, first_name, last_name, is_manager, created_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("User", username))
}

/// List all employees.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, first_name, last_name, is_manager, created_at
        FROM users
        ORDER BY username
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}
