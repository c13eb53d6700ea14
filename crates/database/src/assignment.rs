//! Daily route assignments.
//!
//! A `UNIQUE (user_id, date)` constraint plus a native upsert keep at most one
//! row per agent per day, even when two assignments race.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::RouteAssignment;

/// Whether an assignment call inserted a row or rewrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentOutcome {
    Created,
    Updated,
}

/// Optional narrowing for assignment listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentFilter {
    pub user_id: Option<i64>,
    pub date: Option<NaiveDate>,
}

/// Assign a user to a route for a day, replacing any route already assigned.
pub async fn upsert_assignment(
    pool: &SqlitePool,
    user_id: i64,
    route_id: i64,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<(RouteAssignment, AssignmentOutcome)> {
    let assignment = sqlx::query_as::<_, RouteAssignment>(
        r#"
        INSERT INTO route_assignments (user_id, route_id, date, revision, created_at, updated_at)
        VALUES (?, ?, ?, 1, ?, ?)
        ON CONFLICT(user_id, date) DO UPDATE SET
            route_id = excluded.route_id,
            revision = route_assignments.revision + 1,
            updated_at = excluded.updated_at
        RETURNING id, user_id, route_id, date, revision, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(route_id)
    .bind(date)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::NotFound {
                    entity: "User or Route",
                    id: format!("{}/{}", user_id, route_id),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    let outcome = if assignment.revision == 1 {
        AssignmentOutcome::Created
    } else {
        AssignmentOutcome::Updated
    };

    Ok((assignment, outcome))
}

/// List assignments, latest day first.
pub async fn list_assignments(
    pool: &SqlitePool,
    filter: AssignmentFilter,
) -> Result<Vec<RouteAssignment>> {
    let assignments = sqlx::query_as::<_, RouteAssignment>(
        r#"
        SELECT id, user_id, route_id, date, revision, created_at, updated_at
        FROM route_assignments
        WHERE (? IS NULL OR user_id = ?)
          AND (? IS NULL OR date = ?)
        ORDER BY date DESC, user_id
        "#,
    )
    .bind(filter.user_id)
    .bind(filter.user_id)
    .bind(filter.date)
    .bind(filter.date)
    .fetch_all(pool)
    .await?;

    Ok(assignments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route;
    use crate::test_support::{seed_user, test_db};

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let db = test_db().await;
        let agent = seed_user(&db, "agent", false).await;
        let downtown = route::create_route(db.pool(), "Downtown", "").await.unwrap();
        let suburban = route::create_route(db.pool(), "Suburban", "").await.unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        let (first, outcome) = upsert_assignment(db.pool(), agent.id, downtown.id, day, Utc::now())
            .await
            .unwrap();
        assert_eq!(outcome, AssignmentOutcome::Created);
        assert_eq!(first.revision, 1);

        let (second, outcome) = upsert_assignment(db.pool(), agent.id, suburban.id, day, Utc::now())
            .await
            .unwrap();
        assert_eq!(outcome, AssignmentOutcome::Updated);
        assert_eq!(second.id, first.id);
        assert_eq!(second.route_id, suburban.id);
        assert_eq!(second.revision, 2);
        assert_eq!(second.created_at, first.created_at);

        let rows = list_assignments(
            db.pool(),
            AssignmentFilter {
                user_id: Some(agent.id),
                date: Some(day),
            },
        )
        .await
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].route_id, suburban.id);
    }

    #[tokio::test]
    async fn test_different_days_are_separate_rows() {
        let db = test_db().await;
        let agent = seed_user(&db, "agent", false).await;
        let downtown = route::create_route(db.pool(), "Downtown", "").await.unwrap();
        let monday = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
        let tuesday = NaiveDate::from_ymd_opt(2026, 3, 17).unwrap();

        for day in [monday, tuesday] {
            let (_, outcome) = upsert_assignment(db.pool(), agent.id, downtown.id, day, Utc::now())
                .await
                .unwrap();
            assert_eq!(outcome, AssignmentOutcome::Created);
        }

        let all = list_assignments(db.pool(), AssignmentFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].date, tuesday);
    }

    #[tokio::test]
    async fn test_upsert_unknown_route() {
        let db = test_db().await;
        let agent = seed_user(&db, "agent", false).await;
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        let result = upsert_assignment(db.pool(), agent.id, 999, day, Utc::now()).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }
}
