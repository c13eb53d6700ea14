//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

use database::Database;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Maximum pooled database connections.
    pub pool_size: u32,
    /// Manager account created at startup if missing.
    pub bootstrap_manager: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `FIELD_API_ADDR` | Server bind address | `127.0.0.1:8790` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:fieldtrack.db?mode=rwc` |
    /// | `DB_POOL_SIZE` | Pooled connections | `20` |
    /// | `FIELD_BOOTSTRAP_MANAGER` | Username of a manager to create on startup | (none) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("FIELD_API_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8790".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:fieldtrack.db?mode=rwc".to_string());

        let pool_size = match env::var("DB_POOL_SIZE") {
            Ok(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPoolSize(raw))?,
            Err(_) => Database::DEFAULT_POOL_SIZE,
        };

        let bootstrap_manager = env::var("FIELD_BOOTSTRAP_MANAGER")
            .ok()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Ok(Self {
            addr,
            database_url,
            pool_size,
            bootstrap_manager,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid FIELD_API_ADDR format")]
    InvalidAddr,

    #[error("Invalid DB_POOL_SIZE '{0}' (expected a positive integer)")]
    InvalidPoolSize(String),
}
