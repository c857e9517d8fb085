//! Database layer - connection cache, connectors and event stores
//!
//! # Design Principles
//!
//! - One shared handle per process, established lazily
//! - Concurrent callers join the in-flight attempt instead of racing
//! - Failed attempts are never cached
//! - No locking around queries; the backing store handles concurrency

pub mod connection;
pub mod pool;
pub mod repos;

use std::sync::Arc;

use once_cell::sync::Lazy;

pub use connection::{ConnectionManager, ConnectionState, Connector};
pub use pool::{create_pool, PgConnector};
pub use repos::{EventStore, MemoryConnector, MemoryStore};

static SHARED: Lazy<Arc<ConnectionManager<PgConnector>>> =
    Lazy::new(|| Arc::new(ConnectionManager::new(PgConnector::from_env())));

/// The process-wide Postgres connection manager.
///
/// Every router, repository or command built in this process gets the same
/// manager, so rebuilding them (hot reload, repeated invocations) reuses the
/// established pool. Nothing is shared across OS processes.
pub fn shared() -> Arc<ConnectionManager<PgConnector>> {
    Arc::clone(&SHARED)
}
