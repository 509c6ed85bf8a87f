/**
 * Server Configuration
 *
 * Loaded from environment variables (a `.env` file is read first by the
 * binary):
 *
 * - `SERVER_HOST` - bind address, default `0.0.0.0`
 * - `SERVER_PORT` - default `5000`
 * - `DATABASE_URL` - SQLite URL such as `sqlite://kanboard.db`; when unset
 *   the server keeps everything in memory
 */

use std::sync::Arc;

use crate::backend::store::{MemoryStore, SharedStore, SqliteStore, StoreResult};
use crate::shared::config::ConfigError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("SERVER_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: "SERVER_PORT",
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: get("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url: get("DATABASE_URL"),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Connect the SQLite store when `DATABASE_URL` is configured
///
/// Returns `Ok(None)` when it is not set. A configured database that cannot
/// be opened or migrated is an error.
pub async fn load_database(config: &ServerConfig) -> StoreResult<Option<SqliteStore>> {
    let database_url = match &config.database_url {
        Some(url) => url,
        None => {
            tracing::warn!("DATABASE_URL not set. Boards will be kept in memory only.");
            return Ok(None);
        }
    };

    tracing::info!("Connecting to database...");
    let store = SqliteStore::connect(database_url).await?;
    tracing::info!("Database connected and migrations applied");
    Ok(Some(store))
}

/// The store the server runs on
pub async fn open_store(config: &ServerConfig) -> StoreResult<SharedStore> {
    Ok(match load_database(config).await? {
        Some(store) => Arc::new(store),
        None => Arc::new(MemoryStore::new()),
    })
}
