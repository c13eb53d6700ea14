//! Store visit ledger.

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::StoreVisit;

/// Append an unapproved store visit.
///
/// Visits are not unique: an agent may visit the same store many times.
pub async fn insert_visit(
    pool: &SqlitePool,
    store_id: i64,
    user_id: i64,
    latitude: f64,
    longitude: f64,
    photo: &str,
    timestamp: DateTime<Utc>,
) -> Result<StoreVisit> {
    sqlx::query_as::<_, StoreVisit>(
        r#"
        INSERT INTO store_visits (store_id, user_id, latitude, longitude, photo, is_approved, timestamp)
        VALUES (?, ?, ?, ?, ?, 0, ?)
        RETURNING id, store_id, user_id, latitude, longitude, photo, is_approved, timestamp
        "#,
    )
    .bind(store_id)
    .bind(user_id)
    .bind(latitude)
    .bind(longitude)
    .bind(photo)
    .bind(timestamp)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::not_found("Store", store_id);
            }
        }
        DatabaseError::Sqlx(e)
    })
}

/// List every visit, newest first.
pub async fn list_visits(pool: &SqlitePool) -> Result<Vec<StoreVisit>> {
    let visits = sqlx::query_as::<_, StoreVisit>(
        r#"
        SELECT id, store_id, user_id, latitude, longitude, photo, is_approved, timestamp
        FROM store_visits
        ORDER BY timestamp DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(visits)
}

/// List visits awaiting approval, oldest first.
pub async fn list_pending_visits<'e, E>(executor: E) -> Result<Vec<StoreVisit>>
where
    E: SqliteExecutor<'e>,
{
    let visits = sqlx::query_as::<_, StoreVisit>(
        r#"
        SELECT id, store_id, user_id, latitude, longitude, photo, is_approved, timestamp
        FROM store_visits
        WHERE is_approved = 0
        ORDER BY timestamp, id
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(visits)
}
