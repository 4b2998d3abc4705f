use sqlx::{Connection, PgConnection};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::DatabaseConfig;

/// Errors from the store adapter
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Invalid SQL identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Hands out short-lived connections. Nothing is pooled: every caller gets
/// its own connection and is expected to close it when done.
#[derive(Debug, Clone)]
pub struct DatabaseManager {
    connection_string: String,
    connect_timeout: Duration,
}

impl DatabaseManager {
    pub fn new(connection_string: impl Into<String>, connect_timeout: Duration) -> Self {
        Self { connection_string: connection_string.into(), connect_timeout }
    }

    pub fn from_config(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let base = config.url.as_deref().ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let connection_string = Self::build_connection_string(base, config.name.as_deref())?;
        Ok(Self::new(connection_string, Duration::from_secs(config.connect_timeout_secs)))
    }

    /// Validate the URL and optionally swap the database name in its path.
    fn build_connection_string(base: &str, database_name: Option<&str>) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(base).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(DatabaseError::InvalidDatabaseUrl);
        }
        if let Some(name) = database_name {
            url.set_path(&format!("/{}", name));
        }
        Ok(url.into())
    }

    pub async fn connect(&self) -> Result<PgConnection, DatabaseError> {
        let conn = tokio::time::timeout(
            self.connect_timeout,
            PgConnection::connect(&self.connection_string),
        )
        .await
        .map_err(|_| DatabaseError::ConnectTimeout(self.connect_timeout))??;
        debug!("Opened store connection");
        Ok(conn)
    }
}
