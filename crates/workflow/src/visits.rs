//! Store visits.

use chrono::Utc;
use database::models::StoreVisit;
use database::validation::{self, MAX_PHOTO_LENGTH};
use database::{store, visit, Database};
use tracing::info;

use crate::error::Result;
use crate::identity::Caller;

/// Agents' visits to stores, each awaiting manager approval.
#[derive(Debug, Clone)]
pub struct VisitLedger {
    db: Database,
}

impl VisitLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn record_visit(
        &self,
        caller: &Caller,
        store_id: i64,
        latitude: f64,
        longitude: f64,
        photo: &str,
    ) -> Result<StoreVisit> {
        validation::validate_coordinates(latitude, longitude)?;
        validation::validate_text("photo", photo, MAX_PHOTO_LENGTH)?;
        store::get_store(self.db.pool(), store_id).await?;

        let recorded = visit::insert_visit(
            self.db.pool(),
            store_id,
            caller.user_id,
            latitude,
            longitude,
            photo.trim(),
            Utc::now(),
        )
        .await?;

        info!(
            visit_id = recorded.id,
            store_id,
            user_id = caller.user_id,
            "Store visit recorded"
        );
        Ok(recorded)
    }

    /// Every visit, newest first.
    pub async fn list_all(&self, caller: &Caller) -> Result<Vec<StoreVisit>> {
        caller.require_manager("review store visits")?;
        Ok(visit::list_visits(self.db.pool()).await?)
    }
}

#[cfg(test)]
mod tests {
    use database::models::{CapacitySize, NewStore};

    use super::*;
    use crate::error::WorkflowError;
    use crate::test_support::{seed_user, test_db};

    #[tokio::test]
    async fn test_record_visit() {
        let db = test_db().await;
        let manager = seed_user(&db, "priya", true).await;
        let agent = seed_user(&db, "ravi", false).await;
        let new_store = NewStore {
            route_id: None,
            name: "Downtown Store #1".to_string(),
            manager_name: "Manager 1".to_string(),
            phone_number: "9876543201".to_string(),
            address: "Address Line 1".to_string(),
            latitude: 28.6139,
            longitude: 77.2090,
            capacity_size: CapacitySize::Large,
        };
        let target = store::create_store(db.pool(), &new_store, Utc::now())
            .await
            .unwrap();
        let visits = VisitLedger::new(db);
        let caller = Caller::agent(agent.id);

        let first = visits
            .record_visit(&caller, target.id, 28.6139, 77.2090, "blob://visits/1.jpg")
            .await
            .unwrap();
        assert!(!first.is_approved);

        // Repeat visits to the same store are allowed.
        visits
            .record_visit(&caller, target.id, 28.6139, 77.2090, "blob://visits/2.jpg")
            .await
            .unwrap();

        let all = visits.list_all(&Caller::manager(manager.id)).await.unwrap();
        assert_eq!(all.len(), 2);

        let result = visits.list_all(&caller).await;
        assert!(matches!(result, Err(WorkflowError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_visit_to_unknown_store() {
        let db = test_db().await;
        let agent = seed_user(&db, "ravi", false).await;
        let visits = VisitLedger::new(db);

        let result = visits
            .record_visit(&Caller::agent(agent.id), 99999, 1.0, 1.0, "p")
            .await;
        assert!(matches!(result, Err(WorkflowError::NotFound { entity: "Store", .. })));
    }
}
