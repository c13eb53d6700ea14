//! Daily route assignments.

use chrono::{NaiveDate, Utc};
use database::models::RouteAssignment;
use database::{assignment, route, user, AssignmentFilter, AssignmentOutcome, Database};
use tracing::info;

use crate::error::Result;
use crate::identity::Caller;

/// Which route each agent works on which day.
#[derive(Debug, Clone)]
pub struct AssignmentTable {
    db: Database,
}

impl AssignmentTable {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Put `user_id` on `route_id` for `date`, replacing any earlier
    /// assignment for that day.
    pub async fn assign(
        &self,
        caller: &Caller,
        user_id: i64,
        route_id: i64,
        date: NaiveDate,
    ) -> Result<(RouteAssignment, AssignmentOutcome)> {
        caller.require_manager("assign routes")?;
        user::get_user(self.db.pool(), user_id).await?;
        route::get_route(self.db.pool(), route_id).await?;

        let (assignment, outcome) =
            assignment::upsert_assignment(self.db.pool(), user_id, route_id, date, Utc::now())
                .await?;

        info!(
            assignment_id = assignment.id,
            user_id,
            route_id,
            date = %date,
            revision = assignment.revision,
            outcome = ?outcome,
            "Route assigned"
        );
        Ok((assignment, outcome))
    }

    /// Assignments visible to the caller.
    pub async fn list(
        &self,
        caller: &Caller,
        filter: AssignmentFilter,
    ) -> Result<Vec<RouteAssignment>> {
        let Some(user_id) = caller.scope().narrow(filter.user_id).as_bind() else {
            return Ok(Vec::new());
        };

        Ok(assignment::list_assignments(self.db.pool(), AssignmentFilter { user_id, ..filter }).await?)
    }
}
