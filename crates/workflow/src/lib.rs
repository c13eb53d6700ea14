//! Approval and assignment workflow for field sales and delivery staff.
//!
//! This crate sits between a transport (see the `api` crate) and the
//! [`database`] crate. It resolves who is calling, enforces the manager/agent
//! split, validates input and drives the storage operations:
//!
//! - [`LocationLedger`]: GPS pings and "where is everyone now"
//! - [`AttendanceLedger`]: photo punch-ins and attendance history
//! - [`Directory`]: routes and stores
//! - [`VisitLedger`]: store visits
//! - [`RegularizationDesk`]: requests to mark a missed day as attended
//! - [`ApprovalEngine`]: manager decisions on stores, visits and requests
//! - [`AssignmentTable`]: which route each agent works on which day
//! - [`NotificationBoard`] and [`EmployeeDirectory`]
//!
//! # Example
//!
//! ```rust,ignore
//! use workflow::{DatabaseIdentity, IdentityProvider, Workflow};
//!
//! let db = database::Database::connect("sqlite::memory:").await?;
//! db.migrate().await?;
//!
//! let workflow = Workflow::new(db.clone());
//! let identity = DatabaseIdentity::new(db);
//!
//! let caller = identity.resolve(Some("1")).await?;
//! let ping = workflow.locations.record_ping(&caller, 28.6139, 77.2090).await?;
//! ```

pub mod approval;
pub mod assignment;
pub mod attendance;
pub mod directory;
pub mod employees;
pub mod error;
pub mod identity;
pub mod location;
pub mod notifications;
pub mod regularization;
pub mod scope;
pub mod visits;

#[cfg(test)]
mod test_support;

pub use approval::{ApprovalEngine, ApprovalHooks, Approved, SynthesizeAttendance};
pub use assignment::AssignmentTable;
pub use attendance::AttendanceLedger;
pub use directory::Directory;
pub use employees::EmployeeDirectory;
pub use error::{Result, WorkflowError};
pub use identity::{Caller, DatabaseIdentity, IdentityProvider};
pub use location::LocationLedger;
pub use notifications::NotificationBoard;
pub use regularization::RegularizationDesk;
pub use scope::{Scope, UserFilter};
pub use visits::VisitLedger;

use database::Database;

/// Every workflow component over one shared database.
#[derive(Clone)]
pub struct Workflow {
    pub locations: LocationLedger,
    pub attendance: AttendanceLedger,
    pub directory: Directory,
    pub visits: VisitLedger,
    pub regularizations: RegularizationDesk,
    pub approvals: ApprovalEngine,
    pub assignments: AssignmentTable,
    pub notifications: NotificationBoard,
    pub employees: EmployeeDirectory,
}

impl Workflow {
    /// Build the components with the default approval hooks.
    pub fn new(db: Database) -> Self {
        Self::with_hooks(db, ApprovalHooks::default())
    }

    pub fn with_hooks(db: Database, hooks: ApprovalHooks) -> Self {
        Self {
            locations: LocationLedger::new(db.clone()),
            attendance: AttendanceLedger::new(db.clone()),
            directory: Directory::new(db.clone()),
            visits: VisitLedger::new(db.clone()),
            regularizations: RegularizationDesk::new(db.clone()),
            approvals: ApprovalEngine::with_hooks(db.clone(), hooks),
            assignments: AssignmentTable::new(db.clone()),
            notifications: NotificationBoard::new(db.clone()),
            employees: EmployeeDirectory::new(db),
        }
    }
}
