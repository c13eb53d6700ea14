//! Shared fixtures for unit tests.

use chrono::Utc;

use crate::models::{NewUser, User};
use crate::{user, Database};

pub(crate) async fn test_db() -> Database {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();
    db
}

pub(crate) async fn seed_user(db: &Database, username: &str, is_manager: bool) -> User {
    let new_user = NewUser {
        username: username.to_string(),
        first_name: String::new(),
        last_name: String::new(),
        is_manager,
    };
    user::create_user(db.pool(), &new_user, Utc::now())
        .await
        .unwrap()
}
