//! Application state management

use crate::banguat::BanguatClient;
use crate::config::Config;
use crate::db::SqliteDb;
use crate::error::Result;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// SQLite database connection
    pub db: Arc<SqliteDb>,

    /// Banguat SOAP client
    pub client: BanguatClient,

    /// Runtime configuration
    pub config: Config,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Result<Self> {
        // Create data directory if it doesn't exist
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        tracing::info!("Database path: {:?}", config.db_path);

        let db = Arc::new(SqliteDb::new(&config.db_path)?);
        let client = BanguatClient::new(&config.soap_url, config.soap_timeout);

        Ok(Self { db, client, config })
    }
}
