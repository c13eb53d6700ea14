//! Generic approval transitions for stores, store visits and regularizations.
//!
//! Each approvable table records its state either as a boolean flag
//! (`unapproved → approved`) or a status column (`pending → approved |
//! rejected`). A transition is a single conditional `UPDATE ... WHERE
//! <pending>` run as the first statement of a transaction, so concurrent
//! deciders serialize on SQLite's write lock and exactly one of them sees a
//! changed row. Side effects run through an [`ApprovalHook`] on the same
//! transaction, and only for the call that performed the transition.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{info, warn};

use crate::error::{DatabaseError, Result};
use crate::models::{
    PendingApprovals, RegularizationRequest, RegularizationStatus, Store, StoreVisit,
};
use crate::{regularization, store, visit};

/// The entity kinds that go through approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalKind {
    Store,
    Visit,
    Regularization,
}

impl ApprovalKind {
    /// Entity name used in errors and logs.
    pub fn entity_name(&self) -> &'static str {
        match self {
            ApprovalKind::Store => "Store",
            ApprovalKind::Visit => "StoreVisit",
            ApprovalKind::Regularization => "RegularizationRequest",
        }
    }
}

/// A path segment that names no approvable kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown approval kind '{0}'")]
pub struct UnknownApprovalKind(pub String);

impl FromStr for ApprovalKind {
    type Err = UnknownApprovalKind;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "store" | "stores" => Ok(ApprovalKind::Store),
            "visit" | "visits" | "store_visit" => Ok(ApprovalKind::Visit),
            "regularization" | "regularizations" => Ok(ApprovalKind::Regularization),
            _ => Err(UnknownApprovalKind(s.to_string())),
        }
    }
}

impl fmt::Display for ApprovalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.entity_name())
    }
}

/// Approval state as seen by the engine, whatever the storage shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalState {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalState {
    fn as_str(&self) -> &'static str {
        match self {
            ApprovalState::Pending => "pending",
            ApprovalState::Approved => "approved",
            ApprovalState::Rejected => "rejected",
        }
    }
}

/// A manager's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    fn target(&self) -> ApprovalState {
        match self {
            Decision::Approve => ApprovalState::Approved,
            Decision::Reject => ApprovalState::Rejected,
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Reject => "reject",
        }
    }
}

/// How a table stores its approval state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalColumn {
    /// Boolean column; one-way, no rejection.
    Flag(&'static str),
    /// Text column holding `pending`, `approved` or `rejected`.
    Status(&'static str),
}

impl ApprovalColumn {
    fn pending_predicate(&self) -> String {
        match self {
            ApprovalColumn::Flag(column) => format!("{column} = 0"),
            ApprovalColumn::Status(column) => format!("{column} = 'pending'"),
        }
    }

    fn set_clause(&self, decision: Decision) -> Option<String> {
        match (self, decision) {
            (ApprovalColumn::Flag(column), Decision::Approve) => Some(format!("{column} = 1")),
            (ApprovalColumn::Flag(_), Decision::Reject) => None,
            (ApprovalColumn::Status(column), decision) => {
                Some(format!("{column} = '{}'", decision.target().as_str()))
            }
        }
    }
}

/// A row that takes part in the approval lifecycle.
pub trait Approvable: for<'r> FromRow<'r, SqliteRow> + Send + Sync + Unpin {
    const KIND: ApprovalKind;
    const TABLE: &'static str;
    /// Column list selected and returned for this entity.
    const COLUMNS: &'static str;
    const COLUMN: ApprovalColumn;

    fn id(&self) -> i64;
    fn approval_state(&self) -> ApprovalState;
}

/// Marker for entities whose lifecycle includes rejection.
pub trait Rejectable: Approvable {}

impl Approvable for Store {
    const KIND: ApprovalKind = ApprovalKind::Store;
    const TABLE: &'static str = "stores";
    const COLUMNS: &'static str = "id, route_id, name, manager_name, phone_number, address, \
        latitude, longitude, capacity_size, is_approved, created_at";
    const COLUMN: ApprovalColumn = ApprovalColumn::Flag("is_approved");

    fn id(&self) -> i64 {
        self.id
    }

    fn approval_state(&self) -> ApprovalState {
        if self.is_approved {
            ApprovalState::Approved
        } else {
            ApprovalState::Pending
        }
    }
}

impl Approvable for StoreVisit {
    const KIND: ApprovalKind = ApprovalKind::Visit;
    const TABLE: &'static str = "store_visits";
    const COLUMNS: &'static str =
        "id, store_id, user_id, latitude, longitude, photo, is_approved, timestamp";
    const COLUMN: ApprovalColumn = ApprovalColumn::Flag("is_approved");

    fn id(&self) -> i64 {
        self.id
    }

    fn approval_state(&self) -> ApprovalState {
        if self.is_approved {
            ApprovalState::Approved
        } else {
            ApprovalState::Pending
        }
    }
}

impl Approvable for RegularizationRequest {
    const KIND: ApprovalKind = ApprovalKind::Regularization;
    const TABLE: &'static str = "regularization_requests";
    const COLUMNS: &'static str = "id, user_id, date, reason, status, created_at";
    const COLUMN: ApprovalColumn = ApprovalColumn::Status("status");

    fn id(&self) -> i64 {
        self.id
    }

    fn approval_state(&self) -> ApprovalState {
        match self.status {
            RegularizationStatus::Pending => ApprovalState::Pending,
            RegularizationStatus::Approved => ApprovalState::Approved,
            RegularizationStatus::Rejected => ApprovalState::Rejected,
        }
    }
}

impl Rejectable for RegularizationRequest {}

/// Side effect run inside the approval transaction.
///
/// Called only by the call that moved the row out of its pending state, so
/// an implementation fires at most once per entity. Returning an error rolls
/// the transition back.
#[async_trait]
pub trait ApprovalHook<T: Approvable>: Send + Sync {
    async fn on_approved(&self, conn: &mut SqliteConnection, entity: &T) -> Result<()>;
}

/// Hook for entities whose approval has no side effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSideEffect;

#[async_trait]
impl<T: Approvable> ApprovalHook<T> for NoSideEffect {
    async fn on_approved(&self, _conn: &mut SqliteConnection, _entity: &T) -> Result<()> {
        Ok(())
    }
}

/// Result of a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approval<T> {
    /// The row after the call.
    pub entity: T,
    /// False when the row already carried the requested decision.
    pub transitioned: bool,
}

/// Approve an entity, running `hook` if this call performed the transition.
///
/// Approving an already-approved row returns it unchanged. Approving a
/// rejected row is a [`DatabaseError::Conflict`].
pub async fn approve<T: Approvable>(
    pool: &SqlitePool,
    id: i64,
    hook: &dyn ApprovalHook<T>,
) -> Result<Approval<T>> {
    decide(pool, id, Decision::Approve, hook).await
}

/// Reject a pending entity.
///
/// Re-rejecting is a no-op; rejecting an approved row is a conflict.
pub async fn reject<T: Rejectable>(pool: &SqlitePool, id: i64) -> Result<Approval<T>> {
    decide(pool, id, Decision::Reject, &NoSideEffect).await
}

async fn decide<T: Approvable>(
    pool: &SqlitePool,
    id: i64,
    decision: Decision,
    hook: &dyn ApprovalHook<T>,
) -> Result<Approval<T>> {
    let set = T::COLUMN
        .set_clause(decision)
        .ok_or_else(|| DatabaseError::Conflict {
            entity: T::KIND.entity_name(),
            id,
            state: "unapproved".to_string(),
            action: decision.verb(),
        })?;

    let transition = format!(
        "UPDATE {table} SET {set} WHERE id = ? AND {pending} RETURNING {columns}",
        table = T::TABLE,
        pending = T::COLUMN.pending_predicate(),
        columns = T::COLUMNS,
    );

    let kind = T::KIND;
    let mut tx = pool.begin().await?;

    let changed = sqlx::query_as::<_, T>(&transition)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    if let Some(entity) = changed {
        if decision == Decision::Approve {
            hook.on_approved(&mut *tx, &entity).await?;
        }
        tx.commit().await?;

        info!(kind = %kind, id, decision = decision.verb(), "Approval transition applied");
        return Ok(Approval {
            entity,
            transitioned: true,
        });
    }

    let lookup = format!(
        "SELECT {columns} FROM {table} WHERE id = ?",
        columns = T::COLUMNS,
        table = T::TABLE,
    );
    let current = sqlx::query_as::<_, T>(&lookup)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    tx.rollback().await?;

    let Some(entity) = current else {
        return Err(DatabaseError::not_found(kind.entity_name(), id));
    };

    let state = entity.approval_state();
    if state == decision.target() {
        return Ok(Approval {
            entity,
            transitioned: false,
        });
    }

    warn!(
        kind = %kind,
        id,
        state = state.as_str(),
        decision = decision.verb(),
        "Approval transition refused"
    );
    Err(DatabaseError::Conflict {
        entity: kind.entity_name(),
        id,
        state: state.as_str().to_string(),
        action: decision.verb(),
    })
}

/// Read all three pending pools in one transaction.
pub async fn list_pending(pool: &SqlitePool) -> Result<PendingApprovals> {
    let mut tx = pool.begin().await?;

    let stores = store::list_pending_stores(&mut *tx).await?;
    let visits = visit::list_pending_visits(&mut *tx).await?;
    let regularizations = regularization::list_pending_requests(&mut *tx).await?;

    tx.commit().await?;

    Ok(PendingApprovals {
        stores,
        visits,
        regularizations,
    })
}
