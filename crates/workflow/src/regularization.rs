//! Regularization requests: asking to have a missed day marked as attended.

use chrono::{NaiveDate, Utc};
use database::models::{RegularizationRequest, RegularizationStatus};
use database::validation::{self, MAX_REASON_LENGTH};
use database::{regularization, Database};
use tracing::info;

use crate::error::Result;
use crate::identity::Caller;

#[derive(Debug, Clone)]
pub struct RegularizationDesk {
    db: Database,
}

impl RegularizationDesk {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// File a pending request for the caller.
    pub async fn submit(
        &self,
        caller: &Caller,
        date: NaiveDate,
        reason: &str,
    ) -> Result<RegularizationRequest> {
        validation::validate_text("reason", reason, MAX_REASON_LENGTH)?;

        let request =
            regularization::create_request(self.db.pool(), caller.user_id, date, reason, Utc::now())
                .await?;
        info!(
            request_id = request.id,
            user_id = caller.user_id,
            date = %date,
            "Regularization requested"
        );
        Ok(request)
    }

    /// Requests visible to the caller, newest first.
    ///
    /// Agents see their own; managers see everyone's, optionally narrowed to
    /// one user.
    pub async fn list(
        &self,
        caller: &Caller,
        user_id: Option<i64>,
        status: Option<RegularizationStatus>,
    ) -> Result<Vec<RegularizationRequest>> {
        let Some(user_id) = caller.scope().narrow(user_id).as_bind() else {
            return Ok(Vec::new());
        };

        Ok(regularization::list_requests(self.db.pool(), user_id, status).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkflowError;
    use crate::test_support::{seed_user, test_db};

    #[tokio::test]
    async fn test_submit_and_list_scoped() {
        let db = test_db().await;
        let manager = seed_user(&db, "priya", true).await;
        let ravi = seed_user(&db, "ravi", false).await;
        let anita = seed_user(&db, "anita", false).await;
        let desk = RegularizationDesk::new(db);
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        let filed = desk
            .submit(&Caller::agent(ravi.id), day, "Phone battery died")
            .await
            .unwrap();
        assert_eq!(filed.status, RegularizationStatus::Pending);
        desk.submit(&Caller::agent(anita.id), day, "Field training")
            .await
            .unwrap();

        let own = desk.list(&Caller::agent(ravi.id), None, None).await.unwrap();
        assert_eq!(own, vec![filed]);

        let peek = desk
            .list(&Caller::agent(ravi.id), Some(anita.id), None)
            .await
            .unwrap();
        assert!(peek.is_empty());

        let all = desk
            .list(&Caller::manager(manager.id), None, Some(RegularizationStatus::Pending))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let approved = desk
            .list(&Caller::manager(manager.id), None, Some(RegularizationStatus::Approved))
            .await
            .unwrap();
        assert!(approved.is_empty());
    }

    #[tokio::test]
    async fn test_submit_requires_reason() {
        let db = test_db().await;
        let ravi = seed_user(&db, "ravi", false).await;
        let desk = RegularizationDesk::new(db);
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        let result = desk.submit(&Caller::agent(ravi.id), day, "").await;
        assert!(matches!(result, Err(WorkflowError::Validation(_))));
    }
}
