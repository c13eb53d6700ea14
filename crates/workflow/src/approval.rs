//! Manager approvals across stores, store visits and regularizations.
//!
//! Each entity kind carries its own [`ApprovalHook`]. Approving a
//! regularization synthesizes the attendance record for the requested day;
//! stores and visits have no side effect by default.

use std::sync::Arc;

use async_trait::async_trait;
use database::approval;
use database::models::{PendingApprovals, RegularizationRequest, Store, StoreVisit};
use database::{
    attendance, Approval, ApprovalHook, ApprovalKind, Database, NoSideEffect, SqliteConnection,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::identity::Caller;

/// Writes the attendance record an approved regularization stands for.
#[derive(Debug, Clone, Copy, Default)]
pub struct SynthesizeAttendance;

#[async_trait]
impl ApprovalHook<RegularizationRequest> for SynthesizeAttendance {
    async fn on_approved(
        &self,
        conn: &mut SqliteConnection,
        request: &RegularizationRequest,
    ) -> database::Result<()> {
        let record = attendance::insert_regularized(conn, request).await?;
        info!(
            request_id = request.id,
            user_id = request.user_id,
            attendance_id = record.id,
            "Attendance synthesized from regularization"
        );
        Ok(())
    }
}

/// Side effects run when each kind of entity is approved.
#[derive(Clone)]
pub struct ApprovalHooks {
    pub store: Arc<dyn ApprovalHook<Store>>,
    pub visit: Arc<dyn ApprovalHook<StoreVisit>>,
    pub regularization: Arc<dyn ApprovalHook<RegularizationRequest>>,
}

impl Default for ApprovalHooks {
    fn default() -> Self {
        Self {
            store: Arc::new(NoSideEffect),
            visit: Arc::new(NoSideEffect),
            regularization: Arc::new(SynthesizeAttendance),
        }
    }
}

/// Outcome of approving an entity chosen by kind at runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Approved {
    Store(Approval<Store>),
    Visit(Approval<StoreVisit>),
    Regularization(Approval<RegularizationRequest>),
}

impl Approved {
    pub fn transitioned(&self) -> bool {
        match self {
            Approved::Store(a) => a.transitioned,
            Approved::Visit(a) => a.transitioned,
            Approved::Regularization(a) => a.transitioned,
        }
    }
}

#[derive(Clone)]
pub struct ApprovalEngine {
    db: Database,
    hooks: ApprovalHooks,
}

impl ApprovalEngine {
    pub fn new(db: Database) -> Self {
        Self::with_hooks(db, ApprovalHooks::default())
    }

    pub fn with_hooks(db: Database, hooks: ApprovalHooks) -> Self {
        Self { db, hooks }
    }

    pub async fn approve_store(&self, caller: &Caller, id: i64) -> Result<Approval<Store>> {
        caller.require_manager("approve stores")?;
        let outcome = approval::approve(self.db.pool(), id, self.hooks.store.as_ref()).await?;
        log_decision(caller, ApprovalKind::Store, id, outcome.transitioned);
        Ok(outcome)
    }

    pub async fn approve_visit(&self, caller: &Caller, id: i64) -> Result<Approval<StoreVisit>> {
        caller.require_manager("approve store visits")?;
        let outcome = approval::approve(self.db.pool(), id, self.hooks.visit.as_ref()).await?;
        log_decision(caller, ApprovalKind::Visit, id, outcome.transitioned);
        Ok(outcome)
    }

    /// Approve a regularization. The attendance record is created at most
    /// once, however many times or however concurrently this is called.
    pub async fn approve_regularization(
        &self,
        caller: &Caller,
        id: i64,
    ) -> Result<Approval<RegularizationRequest>> {
        caller.require_manager("approve regularizations")?;
        let outcome =
            approval::approve(self.db.pool(), id, self.hooks.regularization.as_ref()).await?;
        log_decision(caller, ApprovalKind::Regularization, id, outcome.transitioned);
        Ok(outcome)
    }

    pub async fn reject_regularization(
        &self,
        caller: &Caller,
        id: i64,
    ) -> Result<Approval<RegularizationRequest>> {
        caller.require_manager("reject regularizations")?;
        let outcome = approval::reject::<RegularizationRequest>(self.db.pool(), id).await?;
        log_decision(caller, ApprovalKind::Regularization, id, outcome.transitioned);
        Ok(outcome)
    }

    /// Approve whichever entity `kind` names.
    pub async fn approve(&self, caller: &Caller, kind: ApprovalKind, id: i64) -> Result<Approved> {
        Ok(match kind {
            ApprovalKind::Store => Approved::Store(self.approve_store(caller, id).await?),
            ApprovalKind::Visit => Approved::Visit(self.approve_visit(caller, id).await?),
            ApprovalKind::Regularization => {
                Approved::Regularization(self.approve_regularization(caller, id).await?)
            }
        })
    }

    /// Everything awaiting a manager's decision.
    pub async fn list_pending(&self, caller: &Caller) -> Result<PendingApprovals> {
        caller.require_manager("review pending approvals")?;
        Ok(approval::list_pending(self.db.pool()).await?)
    }
}

fn log_decision(caller: &Caller, kind: ApprovalKind, id: i64, transitioned: bool) {
    if transitioned {
        info!(manager_id = caller.user_id, kind = %kind, id, "Decision recorded");
    } else {
        debug!(manager_id = caller.user_id, kind = %kind, id, "Decision already recorded");
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike, Utc};
    use database::models::{CapacitySize, NewStore, RegularizationStatus};
    use database::{regularization, store, visit};

    use super::*;
    use crate::error::WorkflowError;
    use crate::test_support::{seed_user, test_db};

    fn new_store(name: &str) -> NewStore {
        NewStore {
            route_id: None,
            name: name.to_string(),
            manager_name: "Manager 1".to_string(),
            phone_number: "9876543201".to_string(),
            address: "Address Line 1".to_string(),
            latitude: 28.6139,
            longitude: 77.2090,
            capacity_size: CapacitySize::Medium,
        }
    }

    #[tokio::test]
    async fn test_regularization_approval_synthesizes_attendance_once() {
        let db = test_db().await;
        let manager = Caller::manager(seed_user(&db, "priya", true).await.id);
        let agent = seed_user(&db, "ravi", false).await;
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let request =
            regularization::create_request(db.pool(), agent.id, day, "Phone died", Utc::now())
                .await
                .unwrap();
        let engine = ApprovalEngine::new(db.clone());

        let first = engine.approve_regularization(&manager, request.id).await.unwrap();
        assert!(first.transitioned);
        assert_eq!(first.entity.status, RegularizationStatus::Approved);

        let second = engine.approve_regularization(&manager, request.id).await.unwrap();
        assert!(!second.transitioned);

        let records = attendance::list_for_regularization(db.pool(), request.id)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.user_id, agent.id);
        assert_eq!(record.timestamp.date_naive(), day);
        assert_eq!(record.timestamp.hour(), 9);
        assert_eq!((record.latitude, record.longitude), (0.0, 0.0));
        assert_eq!(record.photo, attendance::REGULARIZED_PHOTO);
    }

    #[tokio::test]
    async fn test_reject_then_approve_is_conflict() {
        let db = test_db().await;
        let manager = Caller::manager(seed_user(&db, "priya", true).await.id);
        let agent = seed_user(&db, "ravi", false).await;
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let request =
            regularization::create_request(db.pool(), agent.id, day, "Phone died", Utc::now())
                .await
                .unwrap();
        let engine = ApprovalEngine::new(db.clone());

        let rejected = engine.reject_regularization(&manager, request.id).await.unwrap();
        assert_eq!(rejected.entity.status, RegularizationStatus::Rejected);

        let result = engine.approve_regularization(&manager, request.id).await;
        assert!(matches!(result, Err(WorkflowError::Conflict(_))));

        let records = attendance::list_for_regularization(db.pool(), request.id)
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_agents_cannot_decide() {
        let db = test_db().await;
        let agent = Caller::agent(seed_user(&db, "ravi", false).await.id);
        let created = store::create_store(db.pool(), &new_store("A"), Utc::now())
            .await
            .unwrap();
        let engine = ApprovalEngine::new(db.clone());

        let result = engine.approve_store(&agent, created.id).await;
        assert!(matches!(result, Err(WorkflowError::Forbidden(_))));
        let result = engine.list_pending(&agent).await;
        assert!(matches!(result, Err(WorkflowError::Forbidden(_))));

        let current = store::get_store(db.pool(), created.id).await.unwrap();
        assert!(!current.is_approved);
    }

    #[tokio::test]
    async fn test_approve_by_kind_and_pending_pool() {
        let db = test_db().await;
        let manager = Caller::manager(seed_user(&db, "priya", true).await.id);
        let agent = seed_user(&db, "ravi", false).await;
        let first = store::create_store(db.pool(), &new_store("A"), Utc::now())
            .await
            .unwrap();
        store::create_store(db.pool(), &new_store("B"), Utc::now())
            .await
            .unwrap();
        let logged = visit::insert_visit(db.pool(), first.id, agent.id, 1.0, 1.0, "p", Utc::now())
            .await
            .unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        regularization::create_request(db.pool(), agent.id, day, "Sick", Utc::now())
            .await
            .unwrap();
        let engine = ApprovalEngine::new(db);

        let pending = engine.list_pending(&manager).await.unwrap();
        assert_eq!(
            (pending.stores.len(), pending.visits.len(), pending.regularizations.len()),
            (2, 1, 1)
        );

        let result = engine.approve(&manager, ApprovalKind::Store, 99999).await;
        assert!(matches!(result, Err(WorkflowError::NotFound { entity: "Store", .. })));
        assert_eq!(engine.list_pending(&manager).await.unwrap(), pending);

        let approved = engine
            .approve(&manager, ApprovalKind::Visit, logged.id)
            .await
            .unwrap();
        assert!(approved.transitioned());
        assert!(matches!(approved, Approved::Visit(ref a) if a.entity.is_approved));

        let approved = engine
            .approve(&manager, ApprovalKind::Store, first.id)
            .await
            .unwrap();
        assert!(approved.transitioned());

        let pending = engine.list_pending(&manager).await.unwrap();
        assert_eq!(pending.len(), 2);
    }
}
