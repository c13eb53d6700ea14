//! Database models.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An employee. Managers approve, assign and broadcast; agents work routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Unique login name.
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the user holds the manager role.
    pub is_manager: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields for a new employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_manager: bool,
}

/// A delivery or sales route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// A route together with the number of stores currently on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RouteSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Derived at read time, never stored.
    pub store_count: i64,
}

/// Physical size class of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CapacitySize {
    Small,
    Medium,
    Large,
}

impl CapacitySize {
    /// Stored and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CapacitySize::Small => "small",
            CapacitySize::Medium => "medium",
            CapacitySize::Large => "large",
        }
    }
}

impl fmt::Display for CapacitySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A store on a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Store {
    pub id: i64,
    /// Owning route; cleared if the route is deleted.
    pub route_id: Option<i64>,
    pub name: String,
    pub manager_name: String,
    pub phone_number: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity_size: CapacitySize,
    /// Set only through an approval.
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when onboarding a store.
///
/// Has no approval field. New stores always start unapproved and an
/// `is_approved` key in a JSON payload is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStore {
    pub route_id: Option<i64>,
    pub name: String,
    pub manager_name: String,
    pub phone_number: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity_size: CapacitySize,
}

/// One geotagged location sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LocationPing {
    pub id: i64,
    pub user_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

/// An attendance punch, live or synthesized from a regularization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    pub id: i64,
    pub user_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// Opaque photo reference from blob storage, or the regularization placeholder.
    pub photo: String,
    pub timestamp: DateTime<Utc>,
    /// Request that produced this record, for synthesized rows.
    pub regularization_id: Option<i64>,
}

impl AttendanceRecord {
    /// Whether this record came from an approved regularization.
    pub fn is_regularized(&self) -> bool {
        self.regularization_id.is_some()
    }
}

/// An agent's visit to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StoreVisit {
    pub id: i64,
    pub store_id: i64,
    pub user_id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub photo: String,
    pub is_approved: bool,
    pub timestamp: DateTime<Utc>,
}

/// Lifecycle of a regularization request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RegularizationStatus {
    Pending,
    Approved,
    Rejected,
}

impl RegularizationStatus {
    /// Stored and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegularizationStatus::Pending => "pending",
            RegularizationStatus::Approved => "approved",
            RegularizationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RegularizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A retroactive request to mark a past date as attended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RegularizationRequest {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub reason: String,
    pub status: RegularizationStatus,
    pub created_at: DateTime<Utc>,
}

/// Binding of an agent to a route for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RouteAssignment {
    pub id: i64,
    pub user_id: i64,
    pub route_id: i64,
    pub date: NaiveDate,
    /// Starts at 1 and increments on every re-assignment.
    pub revision: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A manager broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub sender_id: i64,
    /// Sender's username, joined at read time.
    pub sender_name: String,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Everything awaiting a manager decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingApprovals {
    pub stores: Vec<Store>,
    pub visits: Vec<StoreVisit>,
    pub regularizations: Vec<RegularizationRequest>,
}

impl PendingApprovals {
    /// Total rows across all three pools.
    pub fn len(&self) -> usize {
        self.stores.len() + self.visits.len() + self.regularizations.len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
