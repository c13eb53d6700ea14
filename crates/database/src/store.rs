//! Store directory operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{NewStore, Store};

/// Optional narrowing for store listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFilter {
    /// Only stores on this route.
    pub route_id: Option<i64>,
    /// Only stores in this approval state.
    pub approved: Option<bool>,
}

/// Onboard a store. The row always starts unapproved.
pub async fn create_store(
    pool: &SqlitePool,
    store: &NewStore,
    created_at: DateTime<Utc>,
) -> Result<Store> {
    sqlx::query_as::<_, Store>(
        r#"
        INSERT INTO stores (
            route_id, name, manager_name, phone_number, address,
            latitude, longitude, capacity_size, is_approved, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?)
        RETURNING id, route_id, name, manager_name, phone_number, address,
            latitude, longitude, capacity_size, is_approved, created_at
        "#,
    )
    .bind(store.route_id)
    .bind(store.name.trim())
    .bind(store.manager_name.trim())
    .bind(store.phone_number.trim())
    .bind(store.address.trim())
    .bind(store.latitude)
    .bind(store.longitude)
    .bind(store.capacity_size)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::NotFound {
                    entity: "Route",
                    id: store
                        .route_id
                        .map(|id| id.to_string())
                        .unwrap_or_default(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })
}

/// Get a store by ID.
pub async fn get_store(pool: &SqlitePool, id: i64) -> Result<Store> {
    sqlx::query_as::<_, Store>(
        r#"
        SELECT id, route_id, name, manager_name, phone_number, address,
            latitude, longitude, capacity_size, is_approved, created_at
        FROM stores
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Store", id))
}

/// List stores, optionally narrowed by route and approval state.
pub async fn list_stores(pool: &SqlitePool, filter: StoreFilter) -> Result<Vec<Store>> {
    let stores = sqlx::query_as::<_, Store>(
        r#"
        SELECT id, route_id, name, manager_name, phone_number, address,
            latitude, longitude, capacity_size, is_approved, created_at
        FROM stores
        WHERE (? IS NULL OR route_id = ?)
          AND (? IS NULL OR is_approved = ?)
        ORDER BY name, id
        "#,
    )
    .bind(filter.route_id)
    .bind(filter.route_id)
    .bind(filter.approved)
    .bind(filter.approved)
    .fetch_all(pool)
    .await?;

    Ok(stores)
}

/// List stores awaiting approval, oldest first.
pub async fn list_pending_stores<'e, E>(executor: E) -> Result<Vec<Store>>
where
    E: SqliteExecutor<'e>,
{
    let stores = sqlx::query_as::<_, Store>(
        r#"
        SELECT id, route_id, name, manager_name, phone_number, address,
            latitude, longitude, capacity_size, is_approved, created_at
        FROM stores
        WHERE is_approved = 0
        ORDER BY created_at, id
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(stores)
}
