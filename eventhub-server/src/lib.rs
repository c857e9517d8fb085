//! eventhub-server: event lookup data layer
//!
//! Resolves events by slug, finds related events by shared tags, and keeps a
//! single shared database connection alive across many short-lived callers.
//!
//! - [`db::ConnectionManager`] owns the process-wide connection cache
//! - [`repository::EventRepository`] runs the event reads on top of it
//! - [`http`] is the thin axum layer that maps results to responses

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod repository;

pub use config::DatabaseConfig;
pub use db::{ConnectionManager, ConnectionState, Connector, MemoryConnector, MemoryStore, PgConnector};
pub use error::{ConnectionError, RepoError};
pub use models::{Event, Slug};
pub use repository::EventRepository;
