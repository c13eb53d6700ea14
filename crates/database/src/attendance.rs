//! Attendance ledger.
//!
//! Records come from two producers: a live punch-in, which also logs a
//! location ping in the same transaction, and an approved regularization,
//! which backdates a record to the requested day.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::location;
use crate::models::{AttendanceRecord, LocationPing, RegularizationRequest};

/// Photo reference stored on records synthesized from a regularization.
pub const REGULARIZED_PHOTO: &str = "regularized";

/// Hour of day (UTC) given to synthesized records.
pub const REGULARIZED_HOUR: i64 = 9;

/// Timestamp given to a record synthesized for `date`.
pub fn regularized_timestamp(date: NaiveDate) -> DateTime<Utc> {
    let start_of_day = date.and_time(NaiveTime::default());
    Utc.from_utc_datetime(&(start_of_day + Duration::hours(REGULARIZED_HOUR)))
}

async fn insert_record<'e, E>(
    executor: E,
    user_id: i64,
    latitude: f64,
    longitude: f64,
    photo: &str,
    timestamp: DateTime<Utc>,
    regularization_id: Option<i64>,
) -> Result<AttendanceRecord>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_as::<_, AttendanceRecord>(
        r#"
        INSERT INTO attendance (user_id, latitude, longitude, photo, timestamp, regularization_id)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, user_id, latitude, longitude, photo, timestamp, regularization_id
        "#,
    )
    .bind(user_id)
    .bind(latitude)
    .bind(longitude)
    .bind(photo)
    .bind(timestamp)
    .bind(regularization_id)
    .fetch_one(executor)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::not_found("User", user_id);
            }
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "AttendanceRecord",
                    id: format!("regularization/{}", regularization_id.unwrap_or_default()),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })
}

/// Record a live punch-in together with the matching location ping.
///
/// Both rows are written in one transaction: if either insert fails,
/// neither is visible.
pub async fn punch_in(
    pool: &SqlitePool,
    user_id: i64,
    latitude: f64,
    longitude: f64,
    photo: &str,
    timestamp: DateTime<Utc>,
) -> Result<(AttendanceRecord, LocationPing)> {
    let mut tx = pool.begin().await?;

    let record = insert_record(
        &mut *tx, user_id, latitude, longitude, photo, timestamp, None,
    )
    .await?;
    let ping = location::insert_ping(&mut *tx, user_id, latitude, longitude, timestamp).await?;

    tx.commit().await?;

    tracing::debug!(user_id, attendance_id = record.id, ping_id = ping.id, "Punch-in recorded");
    Ok((record, ping))
}

/// Synthesize the attendance record for an approved regularization.
///
/// Runs on the approval transaction's connection. The record sits at the
/// canonical hour on the requested date with sentinel (0, 0) coordinates.
pub async fn insert_regularized(
    conn: &mut SqliteConnection,
    request: &RegularizationRequest,
) -> Result<AttendanceRecord> {
    insert_record(
        conn,
        request.user_id,
        0.0,
        0.0,
        REGULARIZED_PHOTO,
        regularized_timestamp(request.date),
        Some(request.id),
    )
    .await
}

/// List a user's attendance, most recent first.
///
/// `range` narrows to `[start, end)` calendar days.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<Vec<AttendanceRecord>> {
    let (from, until) = match range {
        Some((start, end)) => (
            Some(Utc.from_utc_datetime(&start.and_time(NaiveTime::default()))),
            Some(Utc.from_utc_datetime(&end.and_time(NaiveTime::default()))),
        ),
        None => (None, None),
    };

    let records = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, user_id, latitude, longitude, photo, timestamp, regularization_id
        FROM attendance
        WHERE user_id = ?
          AND (? IS NULL OR timestamp >= ?)
          AND (? IS NULL OR timestamp < ?)
        ORDER BY timestamp DESC, id DESC
        "#,
    )
    .bind(user_id)
    .bind(from)
    .bind(from)
    .bind(until)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Get the records synthesized for a regularization request.
///
/// At most one exists; a `Vec` lets callers assert exactly that.
pub async fn list_for_regularization(
    pool: &SqlitePool,
    request_id: i64,
) -> Result<Vec<AttendanceRecord>> {
    let records = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, user_id, latitude, longitude, photo, timestamp, regularization_id
        FROM attendance
        WHERE regularization_id = ?
        "#,
    )
    .bind(request_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_user, test_db};

    #[tokio::test]
    async fn test_punch_in_writes_attendance_and_ping() {
        let db = test_db().await;
        let agent = seed_user(&db, "agent", false).await;
        let now = Utc::now();

        let (record, ping) = punch_in(db.pool(), agent.id, 12.0, 77.0, "photos/a.jpg", now)
            .await
            .unwrap();

        assert_eq!(record.user_id, agent.id);
        assert_eq!((record.latitude, record.longitude), (12.0, 77.0));
        assert_eq!((ping.latitude, ping.longitude), (12.0, 77.0));
        assert_eq!(record.timestamp, ping.timestamp);
        assert!(!record.is_regularized());

        let latest = location::latest_ping(db.pool(), agent.id).await.unwrap();
        assert_eq!(latest.id, ping.id);
    }

    #[tokio::test]
    async fn test_punch_in_rolls_back_when_ping_write_fails() {
        let db = test_db().await;
        let agent = seed_user(&db, "agent", false).await;

        // The attendance insert succeeds; the ping insert then has no table.
        sqlx::query("DROP TABLE location_pings")
            .execute(db.pool())
            .await
            .unwrap();

        let result = punch_in(db.pool(), agent.id, 12.0, 77.0, "photos/a.jpg", Utc::now()).await;
        assert!(matches!(result, Err(DatabaseError::Sqlx(_))));

        let records = list_for_user(db.pool(), agent.id, None).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first_and_month_range() {
        let db = test_db().await;
        let agent = seed_user(&db, "agent", false).await;
        let feb = Utc.with_ymd_and_hms(2026, 2, 27, 9, 0, 0).unwrap();
        let mar_1 = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mar_31 = Utc.with_ymd_and_hms(2026, 3, 31, 18, 0, 0).unwrap();

        for at in [mar_1, feb, mar_31] {
            punch_in(db.pool(), agent.id, 1.0, 1.0, "p", at).await.unwrap();
        }

        let all = list_for_user(db.pool(), agent.id, None).await.unwrap();
        let stamps: Vec<_> = all.iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![mar_31, mar_1, feb]);

        let march = (
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
        );
        let in_march = list_for_user(db.pool(), agent.id, Some(march)).await.unwrap();
        assert_eq!(in_march.len(), 2);
    }

    #[test]
    fn test_regularized_timestamp() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assert_eq!(
            regularized_timestamp(date),
            Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap()
        );
    }
}
