//! SQLite persistence layer for the field workforce tracker.
//!
//! This crate provides async database operations for employees, routes and
//! stores, the location/attendance/visit ledgers, regularization requests,
//! daily route assignments and manager notifications, using SQLx with SQLite.
//!
//! Invariants that must hold under concurrent requests are enforced here, in
//! storage: the one-assignment-per-agent-per-day upsert, the all-or-nothing
//! punch-in, and the at-most-once approval side effect.
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use database::{Database, models::NewUser, user, location};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:fieldtrack.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Create an agent and record where they are
//!     let agent = NewUser {
//!         username: "ravi".to_string(),
//!         first_name: "Ravi".to_string(),
//!         last_name: "Kumar".to_string(),
//!         is_manager: false,
//!     };
//!     let agent = user::create_user(db.pool(), &agent, Utc::now()).await?;
//!     location::insert_ping(db.pool(), agent.id, 28.6139, 77.2090, Utc::now()).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod approval;
pub mod assignment;
pub mod attendance;
pub mod error;
pub mod location;
pub mod models;
pub mod notification;
pub mod regularization;
pub mod route;
pub mod store;
pub mod user;
pub mod validation;
pub mod visit;

#[cfg(test)]
mod test_support;

pub use approval::{
    Approvable, Approval, ApprovalHook, ApprovalKind, ApprovalState, NoSideEffect, Rejectable,
    UnknownApprovalKind,
};
pub use assignment::{AssignmentFilter, AssignmentOutcome};
pub use error::{DatabaseError, Result};
pub use models::{
    AttendanceRecord, CapacitySize, LocationPing, NewStore, NewUser, Notification,
    PendingApprovals, RegularizationRequest, RegularizationStatus, Route, RouteAssignment,
    RouteSummary, Store, StoreVisit, User,
};
pub use store::StoreFilter;
pub use validation::ValidationError;

/// Connection type handed to [`ApprovalHook`] implementations.
pub use sqlx::SqliteConnection;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Each inbound request holds at most one connection at a time.
    pub const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/fieldtrack.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
