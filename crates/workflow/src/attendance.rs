//! Attendance punch-ins and attendance history.

use chrono::{NaiveDate, Utc};
use database::models::AttendanceRecord;
use database::validation::{self, MAX_PHOTO_LENGTH};
use database::{attendance, user, Database};
use tracing::info;

use crate::error::{Result, WorkflowError};
use crate::identity::Caller;

/// Live punch-ins plus records synthesized from approved regularizations.
#[derive(Debug, Clone)]
pub struct AttendanceLedger {
    db: Database,
}

impl AttendanceLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Punch in at the caller's position with a geotagged photo reference.
    ///
    /// Also records a location ping with the same coordinates; both rows are
    /// written or neither is.
    pub async fn punch_in(
        &self,
        caller: &Caller,
        latitude: f64,
        longitude: f64,
        photo: &str,
    ) -> Result<AttendanceRecord> {
        validation::validate_coordinates(latitude, longitude)?;
        validation::validate_text("photo", photo, MAX_PHOTO_LENGTH)?;

        let (record, ping) = attendance::punch_in(
            self.db.pool(),
            caller.user_id,
            latitude,
            longitude,
            photo.trim(),
            Utc::now(),
        )
        .await?;

        info!(
            user_id = caller.user_id,
            attendance_id = record.id,
            ping_id = ping.id,
            "Punched in"
        );
        Ok(record)
    }

    /// The caller's own attendance, most recent first.
    pub async fn list_own(&self, caller: &Caller) -> Result<Vec<AttendanceRecord>> {
        Ok(attendance::list_for_user(self.db.pool(), caller.user_id, None).await?)
    }

    /// Attendance for `user_id`, optionally limited to one month's `[start, end)`.
    ///
    /// Agents may only read their own history.
    pub async fn list_for(
        &self,
        caller: &Caller,
        user_id: i64,
        month: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<AttendanceRecord>> {
        if !caller.scope().permits(user_id) {
            return Err(WorkflowError::Forbidden("view another user's attendance"));
        }

        if user_id != caller.user_id {
            user::get_user(self.db.pool(), user_id).await?;
        }

        Ok(attendance::list_for_user(self.db.pool(), user_id, month).await?)
    }
}

#[cfg(test)]
mod tests {
    use database::location;

    use super::*;
    use crate::test_support::{seed_user, test_db};

    #[tokio::test]
    async fn test_punch_in_writes_matching_ping() {
        let db = test_db().await;
        let agent = seed_user(&db, "ravi", false).await;
        let caller = Caller::agent(agent.id);
        let ledger = AttendanceLedger::new(db.clone());

        let record = ledger
            .punch_in(&caller, 12.0, 77.0, "blob://attendance/ravi-0301.jpg")
            .await
            .unwrap();
        assert_eq!(record.user_id, agent.id);
        assert!(!record.is_regularized());

        let ping = location::latest_ping(db.pool(), agent.id).await.unwrap();
        assert_eq!(ping.latitude, 12.0);
        assert_eq!(ping.longitude, 77.0);
        assert_eq!(ping.timestamp, record.timestamp);

        let own = ledger.list_own(&caller).await.unwrap();
        assert_eq!(own, vec![record]);
    }

    #[tokio::test]
    async fn test_punch_in_requires_photo() {
        let db = test_db().await;
        let agent = seed_user(&db, "ravi", false).await;
        let ledger = AttendanceLedger::new(db);

        let result = ledger.punch_in(&Caller::agent(agent.id), 12.0, 77.0, "  ").await;
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_for_is_scoped_by_role() {
        let db = test_db().await;
        let manager = seed_user(&db, "priya", true).await;
        let agent = seed_user(&db, "ravi", false).await;
        let other = seed_user(&db, "anita", false).await;
        let ledger = AttendanceLedger::new(db);

        ledger
            .punch_in(&Caller::agent(agent.id), 12.0, 77.0, "p")
            .await
            .unwrap();

        let seen = ledger
            .list_for(&Caller::manager(manager.id), agent.id, None)
            .await
            .unwrap();
        assert_eq!(seen.len(), 1);

        let result = ledger.list_for(&Caller::agent(other.id), agent.id, None).await;
        assert!(matches!(result, Err(WorkflowError::Forbidden(_))));

        let result = ledger
            .list_for(&Caller::manager(manager.id), 4242, None)
            .await;
        assert!(matches!(result, Err(WorkflowError::NotFound { entity: "User", .. })));

        let own = ledger
            .list_for(&Caller::agent(agent.id), agent.id, None)
            .await
            .unwrap();
        assert_eq!(own.len(), 1);
    }

    #[tokio::test]
    async fn test_list_for_month_window() {
        let db = test_db().await;
        let manager = seed_user(&db, "priya", true).await;
        let agent = seed_user(&db, "ravi", false).await;
        let ledger = AttendanceLedger::new(db);

        ledger
            .punch_in(&Caller::agent(agent.id), 12.0, 77.0, "p")
            .await
            .unwrap();

        let long_ago = validation::parse_month("2001-02").unwrap();
        let records = ledger
            .list_for(&Caller::manager(manager.id), agent.id, Some(long_ago))
            .await
            .unwrap();
        assert!(records.is_empty());
    }
}
