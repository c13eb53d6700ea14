//! Location ping ledger.

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::LocationPing;

/// Append a location ping.
///
/// Accepts a pool or an open transaction so a punch-in can write its ping
/// alongside the attendance record.
pub async fn insert_ping<'e, E>(
    executor: E,
    user_id: i64,
    latitude: f64,
    longitude: f64,
    timestamp: DateTime<Utc>,
) -> Result<LocationPing>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, LocationPing>(
        r#"
        INSERT INTO location_pings (user_id, latitude, longitude, timestamp)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, latitude, longitude, timestamp
        "#,
    )
    .bind(user_id)
    .bind(latitude)
    .bind(longitude)
    .bind(timestamp)
    .fetch_one(executor)
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

/// Get the chronologically last ping for a user.
pub async fn latest_ping(pool: &SqlitePool, user_id: i64) -> Result<LocationPing> {
    sqlx::query_as::<_, LocationPing>(
        r#"
        SELECT id, user_id, latitude, longitude, timestamp
        FROM location_pings
        WHERE user_id = ?
        ORDER BY timestamp DESC, id DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("LocationPing", user_id))
}

/// Get the newest ping of every user that has ever pinged.
///
/// Newest means highest id: ids are issued in insertion order, so the
/// aggregation never needs to compare timestamps and never ties.
pub async fn latest_ping_per_user(pool: &SqlitePool) -> Result<Vec<LocationPing>> {
    let pings = sqlx::query_as::<_, LocationPing>(
        r#"
        SELECT id, user_id, latitude, longitude, timestamp
        FROM location_pings
        WHERE id IN (
            SELECT MAX(id)
            FROM location_pings
            GROUP BY user_id
        )
        ORDER BY user_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(pings)
}
