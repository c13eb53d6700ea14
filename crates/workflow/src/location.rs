//! Live location tracking.

use chrono::Utc;
use database::models::LocationPing;
use database::{location, validation, Database};
use tracing::debug;

use crate::error::Result;
use crate::identity::Caller;

/// Append-only ledger of GPS pings.
#[derive(Debug, Clone)]
pub struct LocationLedger {
    db: Database,
}

impl LocationLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record the caller's current position.
    pub async fn record_ping(
        &self,
        caller: &Caller,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationPing> {
        validation::validate_coordinates(latitude, longitude)?;

        let ping =
            location::insert_ping(self.db.pool(), caller.user_id, latitude, longitude, Utc::now())
                .await?;
        debug!(user_id = caller.user_id, ping_id = ping.id, "Location ping recorded");
        Ok(ping)
    }

    /// Most recent ping for `target`, or for the caller when `target` is `None`.
    pub async fn latest_ping(&self, caller: &Caller, target: Option<i64>) -> Result<LocationPing> {
        let user_id = target.unwrap_or(caller.user_id);
        Ok(location::latest_ping(self.db.pool(), user_id).await?)
    }

    /// One latest ping per user that has ever pinged.
    pub async fn latest_per_agent(&self) -> Result<Vec<LocationPing>> {
        Ok(location::latest_ping_per_user(self.db.pool()).await?)
    }
}
