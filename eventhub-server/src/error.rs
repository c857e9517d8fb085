//! Error types for eventhub-server

use std::sync::Arc;

use thiserror::Error;

use crate::config::DATABASE_URL_VAR;

/// Failure to obtain a database handle.
///
/// `Clone` so a single failed attempt can be handed to every caller that was
/// waiting on it.
#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    /// No connection target configured. Needs operator intervention.
    #[error("{} is not set; define it in the environment or in .env.local", DATABASE_URL_VAR)]
    NotConfigured,

    /// The connection attempt itself failed (network, auth, ...).
    #[error("failed to connect to database: {0}")]
    Connect(Arc<sqlx::Error>),
}

impl From<sqlx::Error> for ConnectionError {
    fn from(e: sqlx::Error) -> Self {
        Self::Connect(Arc::new(e))
    }
}

/// Repository error: either no handle could be obtained, or a query against
/// an established handle failed.
#[derive(Error, Debug)]
pub enum RepoError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),
}

impl RepoError {
    /// True when the failure happened while running a query (as opposed to
    /// while connecting).
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}
