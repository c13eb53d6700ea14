//! Regularization request storage.
//!
//! Status transitions live in [`crate::approval`]; this module only creates
//! and reads requests.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{RegularizationRequest, RegularizationStatus};

/// File a pending regularization request.
pub async fn create_request(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    reason: &str,
    created_at: DateTime<Utc>,
) -> Result<RegularizationRequest> {
    sqlx::query_as::<_, RegularizationRequest>(
        r#"
        INSERT INTO regularization_requests (user_id, date, reason, status, created_at)
        VALUES (?, ?, ?, 'pending', ?)
        RETURNING id, user_id, date, reason, status, created_at
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(reason.trim())
    .bind(created_at)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::not_found("User", user_id);
            }
        }
        DatabaseError::Sqlx(e)
    })
}

/// Get a request by ID.
pub async fn get_request(pool: &SqlitePool, id: i64) -> Result<RegularizationRequest> {
    sqlx::query_as::<_, RegularizationRequest>(
        r#"
        SELECT id, user_id, date, reason, status, created_at
        FROM regularization_requests
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("RegularizationRequest", id))
}

/// List requests, newest first.
///
/// `user_id` restricts to one requester; `status` to one lifecycle state.
pub async fn list_requests(
    pool: &SqlitePool,
    user_id: Option<i64>,
    status: Option<RegularizationStatus>,
) -> Result<Vec<RegularizationRequest>> {
    let requests = sqlx::query_as::<_, RegularizationRequest>(
        r#"
        SELECT id, user_id, date, reason, status, created_at
        FROM regularization_requests
        WHERE (? IS NULL OR user_id = ?)
          AND (? IS NULL OR status = ?)
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .bind(user_id)
    .bind(status)
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(requests)
}

/// List pending requests, oldest first.
pub async fn list_pending_requests<'e, E>(executor: E) -> Result<Vec<RegularizationRequest>>
where
    E: SqliteExecutor<'e>,
{
    let requests = sqlx::query_as::<_, RegularizationRequest>(
        r#"
        SELECT id, user_id, date, reason, status, created_at
        FROM regularization_requests
        WHERE status = 'pending'
        ORDER BY created_at, id
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(requests)
}
