//! Manager broadcast notifications.

use chrono::Utc;
use database::models::Notification;
use database::validation::{self, MAX_MESSAGE_LENGTH, MAX_TITLE_LENGTH};
use database::{notification, Database};
use tracing::info;

use crate::error::Result;
use crate::identity::Caller;

#[derive(Debug, Clone)]
pub struct NotificationBoard {
    db: Database,
}

impl NotificationBoard {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Post a notification. Delivery to devices happens elsewhere.
    pub async fn send(&self, caller: &Caller, title: &str, message: &str) -> Result<Notification> {
        caller.require_manager("send notifications")?;
        validation::validate_text("title", title, MAX_TITLE_LENGTH)?;
        validation::validate_text("message", message, MAX_MESSAGE_LENGTH)?;

        let posted =
            notification::create_notification(self.db.pool(), caller.user_id, title, message, Utc::now())
                .await?;
        info!(notification_id = posted.id, sender_id = caller.user_id, "Notification posted");
        Ok(posted)
    }

    /// All notifications, newest first.
    pub async fn list(&self) -> Result<Vec<Notification>> {
        Ok(notification::list_notifications(self.db.pool()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkflowError;
    use crate::test_support::{seed_user, test_db};

    #[tokio::test]
    async fn test_send_and_list() {
        let db = test_db().await;
        let manager = seed_user(&db, "priya", true).await;
        let agent = seed_user(&db, "ravi", false).await;
        let board = NotificationBoard::new(db);

        let result = board.send(&Caller::agent(agent.id), "Hi", "Hello").await;
        assert!(matches!(result, Err(WorkflowError::Forbidden(_))));

        let result = board.send(&Caller::manager(manager.id), "Holiday", " ").await;
        assert!(matches!(result, Err(WorkflowError::Validation(_))));

        let posted = board
            .send(
                &Caller::manager(manager.id),
                "Holiday",
                "Office closed on Friday",
            )
            .await
            .unwrap();
        assert_eq!(posted.sender_name, "priya");

        let all = board.list().await.unwrap();
        assert_eq!(all, vec![posted]);
    }
}
