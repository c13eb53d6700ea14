//! Route operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Route, RouteSummary};

/// Create a new route.
pub async fn create_route(pool: &SqlitePool, name: &str, description: &str) -> Result<Route> {
    let route = sqlx::query_as::<_, Route>(
        r#"
        INSERT INTO routes (name, description)
        VALUES (?, ?)
        RETURNING id, name, description
        "#,
    )
    .bind(name.trim())
    .bind(description.trim())
    .fetch_one(pool)
    .await?;

    Ok(route)
}

/// Get a route by ID.
pub async fn get_route(pool: &SqlitePool, id: i64) -> Result<Route> {
    sqlx::query_as::<_, Route>(
        r#"
        SELECT id, name, description
        FROM routes
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Route", id))
}

/// List routes with the number of stores on each.
pub async fn list_routes_with_store_counts(pool: &SqlitePool) -> Result<Vec<RouteSummary>> {
    let routes = sqlx::query_as::<_, RouteSummary>(
        r#"
        SELECT r.id, r.name, r.description, COUNT(s.id) AS store_count
        FROM routes r
        LEFT JOIN stores s ON s.route_id = r.id
        GROUP BY r.id, r.name, r.description
        ORDER BY r.name, r.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(routes)
}
