//! Postgres connector
//!
//! Uses sqlx PgPool with explicit connection limits. The pool is the handle
//! cached by [`ConnectionManager`](super::ConnectionManager); cloning it
//! shares the same connections.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::debug;

use super::connection::Connector;
use crate::config::DatabaseConfig;
use crate::error::ConnectionError;

/// Create a PostgreSQL connection pool.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DatabaseConfig::with_url("postgres://localhost/events")).await?;
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, ConnectionError> {
    let url = config.database_url()?;
    debug!(max_connections = config.max_connections, "opening postgres pool");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await?;

    Ok(pool)
}

/// Connects to Postgres.
///
/// Without an explicit config the environment is read inside each attempt,
/// so configuration loaded after startup is honoured.
#[derive(Debug, Clone, Default)]
pub struct PgConnector {
    config: Option<DatabaseConfig>,
}

impl PgConnector {
    /// Read `DATABASE_URL` lazily at connect time.
    pub fn from_env() -> Self {
        Self { config: None }
    }

    /// Use a fixed configuration.
    pub fn with_config(config: DatabaseConfig) -> Self {
        Self {
            config: Some(config),
        }
    }

    fn resolve(&self) -> DatabaseConfig {
        self.config.clone().unwrap_or_else(DatabaseConfig::from_env)
    }
}

#[async_trait]
impl Connector for PgConnector {
    type Handle = PgPool;

    async fn connect(&self) -> Result<PgPool, ConnectionError> {
        create_pool(&self.resolve()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ConnectionManager, ConnectionState};

    #[tokio::test]
    async fn blank_url_is_not_configured() {
        let manager =
            ConnectionManager::new(PgConnector::with_config(DatabaseConfig::with_url("")));

        let err = manager.ensure_connected().await.unwrap_err();
        assert!(matches!(err, ConnectionError::NotConfigured));
        assert_eq!(manager.state(), ConnectionState::Absent);
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p eventhub-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let manager = ConnectionManager::new(PgConnector::from_env());
        let pool = manager.ensure_connected().await.expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
        assert_eq!(manager.state(), ConnectionState::Established);
    }
}
