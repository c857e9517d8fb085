//! Postgres event store
//!
//! Expects an `events` table shaped like [`Event`]:
//! - `slug TEXT UNIQUE` stored in canonical (lower-case) form
//! - `tags TEXT[]` and `agenda TEXT[]`
//! - `created_at TIMESTAMPTZ`, indexed for the default ordering
//!
//! Schema management lives outside this crate.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::EventStore;
use crate::models::{Event, Slug};

const EVENT_COLUMNS: &str = r#"
    id, slug, title, description, overview, image, venue, location,
    date, time, mode, audience, agenda, organizer, tags, created_at, updated_at
"#;

#[async_trait]
impl EventStore for PgPool {
    async fn all_newest_first(&self) -> Result<Vec<Event>, sqlx::Error> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC");

        sqlx::query_as::<_, Event>(&sql).fetch_all(self).await
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Event>, sqlx::Error> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE slug = $1");

        sqlx::query_as::<_, Event>(&sql)
            .bind(slug.as_str())
            .fetch_optional(self)
            .await
    }

    /// Uses the array overlap operator so the intersection runs in the
    /// database (single query, no per-tag round trips).
    async fn find_sharing_tags(
        &self,
        tags: &[String],
        exclude: Uuid,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE tags && $1 AND id <> $2 \
             ORDER BY created_at DESC"
        );

        sqlx::query_as::<_, Event>(&sql)
            .bind(tags)
            .bind(exclude)
            .fetch_all(self)
            .await
    }
}
