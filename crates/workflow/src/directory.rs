//! Routes and the stores on them.

use chrono::Utc;
use database::models::{NewStore, Route, RouteSummary, Store};
use database::validation::{self, MAX_ADDRESS_LENGTH, MAX_NAME_LENGTH};
use database::{route, store, Database, StoreFilter};
use tracing::info;

use crate::error::Result;
use crate::identity::Caller;

/// Route and store directory.
#[derive(Debug, Clone)]
pub struct Directory {
    db: Database,
}

impl Directory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Every route with its current store count.
    pub async fn list_routes(&self) -> Result<Vec<RouteSummary>> {
        Ok(route::list_routes_with_store_counts(self.db.pool()).await?)
    }

    pub async fn create_route(
        &self,
        caller: &Caller,
        name: &str,
        description: &str,
    ) -> Result<Route> {
        caller.require_manager("create routes")?;
        validation::validate_text("name", name, MAX_NAME_LENGTH)?;
        validation::validate_length("description", description, MAX_ADDRESS_LENGTH)?;

        let route = route::create_route(self.db.pool(), name.trim(), description.trim()).await?;
        info!(route_id = route.id, name = %route.name, "Route created");
        Ok(route)
    }

    pub async fn list_stores(&self, filter: StoreFilter) -> Result<Vec<Store>> {
        Ok(store::list_stores(self.db.pool(), filter).await?)
    }

    /// Onboard a store. It stays unapproved until a manager approves it.
    pub async fn create_store(&self, caller: &Caller, new_store: &NewStore) -> Result<Store> {
        validation::validate_text("name", &new_store.name, MAX_NAME_LENGTH)?;
        validation::validate_text("manager name", &new_store.manager_name, MAX_NAME_LENGTH)?;
        validation::validate_phone(&new_store.phone_number)?;
        validation::validate_text("address", &new_store.address, MAX_ADDRESS_LENGTH)?;
        validation::validate_coordinates(new_store.latitude, new_store.longitude)?;

        if let Some(route_id) = new_store.route_id {
            route::get_route(self.db.pool(), route_id).await?;
        }

        let created = store::create_store(self.db.pool(), new_store, Utc::now()).await?;
        info!(
            store_id = created.id,
            route_id = ?created.route_id,
            onboarded_by = caller.user_id,
            "Store onboarded"
        );
        Ok(created)
    }
}
