//! Event store implementations
//!
//! Each connector handle knows how to run the three primitive reads the
//! repository composes:
//! - every event, newest first
//! - one event by canonical slug
//! - every event sharing a tag with a given set, minus one id

pub mod events;
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Event, Slug};

pub use memory::{MemoryConnector, MemoryStore};

/// Primitive event reads against an established handle.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events ordered by `created_at` descending.
    async fn all_newest_first(&self) -> Result<Vec<Event>, sqlx::Error>;

    /// The event whose stored slug equals `slug`, if any.
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Event>, sqlx::Error>;

    /// Events with at least one tag in `tags`, excluding `exclude` by id,
    /// newest first.
    async fn find_sharing_tags(
        &self,
        tags: &[String],
        exclude: Uuid,
    ) -> Result<Vec<Event>, sqlx::Error>;
}
