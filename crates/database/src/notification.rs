//! Manager notification board.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Notification;

/// Post a notification from a sender.
pub async fn create_notification(
    pool: &SqlitePool,
    sender_id: i64,
    title: &str,
    message: &str,
    created_at: DateTime<Utc>,
) -> Result<Notification> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO notifications (sender_id, title, message, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(sender_id)
    .bind(title.trim())
    .bind(message.trim())
    .bind(created_at)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::not_found("User", sender_id);
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    get_notification(pool, id).await
}

/// Get a notification by ID.
pub async fn get_notification(pool: &SqlitePool, id: i64) -> Result<Notification> {
    sqlx::query_as::<_, Notification>(
        r#"
        SELECT n.id, n.sender_id, u.username AS sender_name, n.title, n.message, n.created_at
        FROM notifications n
        INNER JOIN users u ON u.id = n.sender_id
        WHERE n.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Notification", id))
}

/// List all notifications, newest first.
pub async fn list_notifications(pool: &SqlitePool) -> Result<Vec<Notification>> {
    let notifications = sqlx::query_as::<_, Notification>(
        r#"
        SELECT n.id, n.sender_id, u.username AS sender_name, n.title, n.message, n.created_at
        FROM notifications n
        INNER JOIN users u ON u.id = n.sender_id
        ORDER BY n.created_at DESC, n.id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(notifications)
}
