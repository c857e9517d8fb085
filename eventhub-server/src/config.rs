//! Database configuration read from the process environment.

use crate::error::ConnectionError;

/// Environment variable naming the Postgres connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Environment variable overriding the pool size.
pub const MAX_CONNECTIONS_VAR: &str = "EVENTHUB_DB_MAX_CONNECTIONS";

/// Default maximum connections for the pool.
/// Kept low: serverless-style callers share one pool per process.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection settings for the Postgres backend.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection string. `None` or blank means not configured.
    pub url: Option<String>,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl DatabaseConfig {
    /// Config with an explicit connection string.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Snapshot the current process environment.
    ///
    /// Called at connect time rather than at startup so `.env` files loaded
    /// after the manager was built are still picked up.
    pub fn from_env() -> Self {
        let max_connections = std::env::var(MAX_CONNECTIONS_VAR)
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Self {
            url: std::env::var(DATABASE_URL_VAR).ok(),
            max_connections,
        }
    }

    /// The configured connection string.
    ///
    /// # Errors
    ///
    /// [`ConnectionError::NotConfigured`] when the URL is missing or blank.
    pub fn database_url(&self) -> Result<&str, ConnectionError> {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(ConnectionError::NotConfigured),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unconfigured() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert!(matches!(
            config.database_url(),
            Err(ConnectionError::NotConfigured)
        ));
    }

    #[test]
    fn blank_url_is_unconfigured() {
        let config = DatabaseConfig::with_url("   ");
        assert!(matches!(
            config.database_url(),
            Err(ConnectionError::NotConfigured)
        ));
    }

    #[test]
    fn url_is_trimmed() {
        let config = DatabaseConfig::with_url(" postgres://localhost/events \n");
        assert_eq!(config.database_url().unwrap(), "postgres://localhost/events");
    }
}
