//! Event repository
//!
//! Turns the three lookup intents (list, by slug, similar by tag) into
//! store reads. Never manages connections itself: every operation asks the
//! injected [`ConnectionManager`] for a handle first.
//!
//! Error policy:
//! - connection and configuration failures always propagate
//! - query failures propagate from [`EventRepository::list_events`] and the
//!   `try_` reads
//! - [`EventRepository::get_by_slug`] and
//!   [`EventRepository::get_similar_by_slug`] log query failures and degrade
//!   to "not found" / empty so the read path stays total

use std::sync::Arc;

use tracing::{debug, warn};

use crate::db::{ConnectionManager, Connector, EventStore};
use crate::error::{ConnectionError, RepoError};
use crate::models::{Event, Slug};

pub struct EventRepository<C: Connector> {
    connections: Arc<ConnectionManager<C>>,
}

impl<C: Connector> Clone for EventRepository<C> {
    fn clone(&self) -> Self {
        Self {
            connections: Arc::clone(&self.connections),
        }
    }
}

impl<C> EventRepository<C>
where
    C: Connector,
    C::Handle: EventStore,
{
    pub fn new(connections: Arc<ConnectionManager<C>>) -> Self {
        Self { connections }
    }

    /// The connection manager this repository draws handles from.
    pub fn connections(&self) -> &ConnectionManager<C> {
        &self.connections
    }

    /// All events, most recently created first. No pagination.
    pub async fn list_events(&self) -> Result<Vec<Event>, RepoError> {
        let store = self.connections.ensure_connected().await?;
        Ok(store.all_newest_first().await?)
    }

    /// Look up one event by slug, distinguishing "not found" (`Ok(None)`)
    /// from a failed lookup (`Err`).
    pub async fn try_get_by_slug(&self, slug: &str) -> Result<Option<Event>, RepoError> {
        let slug = Slug::normalize(slug);
        let store = self.connections.ensure_connected().await?;
        if slug.is_empty() {
            return Ok(None);
        }
        Ok(store.find_by_slug(&slug).await?)
    }

    /// Look up one event by slug (trimmed, case-insensitive).
    ///
    /// A failed query is logged and reported as `None`.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Event>, ConnectionError> {
        match self.try_get_by_slug(slug).await {
            Ok(event) => Ok(event),
            Err(RepoError::Connection(e)) => Err(e),
            Err(RepoError::Query(e)) => {
                warn!(slug, error = %e, "event lookup failed; reporting not found");
                Ok(None)
            }
        }
    }

    /// Events sharing at least one tag with the event at `slug`, excluding
    /// that event. Empty when the source does not exist or has no tags.
    pub async fn try_get_similar_by_slug(&self, slug: &str) -> Result<Vec<Event>, RepoError> {
        let Some(source) = self.try_get_by_slug(slug).await? else {
            debug!(slug, "no source event for similarity lookup");
            return Ok(Vec::new());
        };

        if source.tags.is_empty() {
            return Ok(Vec::new());
        }

        let store = self.connections.ensure_connected().await?;
        Ok(store.find_sharing_tags(&source.tags, source.id).await?)
    }

    /// Similar events by shared tag. A failed query is logged and reported
    /// as an empty list.
    pub async fn get_similar_by_slug(&self, slug: &str) -> Result<Vec<Event>, ConnectionError> {
        match self.try_get_similar_by_slug(slug).await {
            Ok(events) => Ok(events),
            Err(RepoError::Connection(e)) => Err(e),
            Err(RepoError::Query(e)) => {
                warn!(slug, error = %e, "similar event lookup failed; reporting none");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ConnectionState, MemoryConnector, MemoryStore, PgConnector};
    use crate::DatabaseConfig;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn event(slug: &str, tags: &[&str], hour: u32) -> Event {
        Event {
            id: Uuid::new_v4(),
            slug: slug.into(),
            title: slug.to_uppercase(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap(),
            ..Default::default()
        }
    }

    fn repo(events: Vec<Event>) -> (EventRepository<MemoryConnector>, MemoryStore) {
        let store = MemoryStore::new(events);
        let manager = ConnectionManager::new(MemoryConnector::new(store.clone()));
        (EventRepository::new(Arc::new(manager)), store)
    }

    fn slugs(events: &[Event]) -> Vec<&str> {
        events.iter().map(|e| e.slug.as_str()).collect()
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let (repo, _) = repo(vec![
            event("t1", &[], 1),
            event("t3", &[], 3),
            event("t2", &[], 2),
        ]);

        let events = repo.list_events().await.unwrap();
        assert_eq!(slugs(&events), vec!["t3", "t2", "t1"]);
    }

    #[tokio::test]
    async fn list_propagates_query_failure() {
        let (repo, store) = repo(vec![event("a", &[], 1)]);
        store.set_fail_queries(true);

        let err = repo.list_events().await.unwrap_err();
        assert!(err.is_query());
    }

    #[tokio::test]
    async fn slug_lookup_is_normalized() {
        let (repo, _) = repo(vec![event("summer-fest", &["music"], 1)]);

        let padded = repo.get_by_slug("  Summer-Fest  ").await.unwrap();
        let exact = repo.get_by_slug("summer-fest").await.unwrap();

        assert!(padded.is_some());
        assert_eq!(padded, exact);
    }

    #[tokio::test]
    async fn missing_slug_is_not_an_error() {
        let (repo, _) = repo(vec![event("summer-fest", &[], 1)]);

        assert_eq!(repo.get_by_slug("does-not-exist").await.unwrap(), None);
        assert_eq!(repo.try_get_by_slug("does-not-exist").await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_slug_is_not_found() {
        let (repo, _) = repo(vec![event("", &[], 1), event("a", &[], 2)]);

        assert_eq!(repo.get_by_slug("").await.unwrap(), None);
        assert_eq!(repo.get_by_slug("   ").await.unwrap(), None);
        assert!(repo.get_similar_by_slug("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn slug_query_failure_degrades_to_none() {
        let (repo, store) = repo(vec![event("summer-fest", &[], 1)]);
        store.set_fail_queries(true);

        assert_eq!(repo.get_by_slug("summer-fest").await.unwrap(), None);

        let err = repo.try_get_by_slug("summer-fest").await.unwrap_err();
        assert!(err.is_query());
    }

    #[tokio::test]
    async fn similar_shares_a_tag_and_excludes_source() {
        let (repo, _) = repo(vec![
            event("a", &["x", "y"], 1),
            event("b", &["y", "z"], 2),
            event("c", &["w"], 3),
        ]);

        let similar = repo.get_similar_by_slug("a").await.unwrap();
        assert_eq!(slugs(&similar), vec!["b"]);
    }

    #[tokio::test]
    async fn similar_is_unranked_and_uncapped() {
        let (repo, _) = repo(vec![
            event("src", &["x", "y"], 1),
            event("one-shared", &["x"], 2),
            event("two-shared", &["x", "y"], 3),
            event("other", &["q"], 4),
        ]);

        let similar = repo.get_similar_by_slug("SRC").await.unwrap();
        // Newest first, regardless of how many tags overlap
        assert_eq!(slugs(&similar), vec!["two-shared", "one-shared"]);
    }

    #[tokio::test]
    async fn similar_excludes_by_id_not_slug() {
        // Duplicate slugs violate the uniqueness assumption; the copy that
        // isn't the resolved source is still a candidate.
        let (repo, _) = repo(vec![event("dup", &["x"], 1), event("dup", &["x"], 2)]);

        let source = repo.get_by_slug("dup").await.unwrap().unwrap();
        let similar = repo.get_similar_by_slug("dup").await.unwrap();

        assert_eq!(similar.len(), 1);
        assert_ne!(similar[0].id, source.id);
    }

    #[tokio::test]
    async fn untagged_event_has_no_similar() {
        let (repo, _) = repo(vec![event("lonely", &[], 1), event("b", &["x"], 2)]);
        assert!(repo.get_similar_by_slug("lonely").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn similar_for_missing_source_is_empty() {
        let (repo, _) = repo(vec![event("b", &["x"], 2)]);
        assert!(repo.get_similar_by_slug("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn similar_query_failure_degrades_to_empty() {
        let (repo, store) = repo(vec![event("a", &["x"], 1), event("b", &["x"], 2)]);
        store.set_fail_queries(true);

        assert!(repo.get_similar_by_slug("a").await.unwrap().is_empty());
        assert!(repo.try_get_similar_by_slug("a").await.unwrap_err().is_query());
    }

    #[tokio::test]
    async fn reads_share_one_connection() {
        let (repo, _) = repo(vec![event("a", &["x"], 1)]);
        assert_eq!(repo.connections().state(), ConnectionState::Absent);

        repo.list_events().await.unwrap();
        repo.get_by_slug("a").await.unwrap();
        repo.clone().get_similar_by_slug("a").await.unwrap();

        assert_eq!(repo.connections().state(), ConnectionState::Established);
    }

    #[tokio::test]
    async fn connection_failure_propagates_from_total_reads() {
        let manager = ConnectionManager::new(PgConnector::with_config(DatabaseConfig::default()));
        let repo = EventRepository::new(Arc::new(manager));

        assert!(matches!(
            repo.get_by_slug("a").await,
            Err(ConnectionError::NotConfigured)
        ));
        assert!(matches!(
            repo.get_similar_by_slug("a").await,
            Err(ConnectionError::NotConfigured)
        ));
        assert!(matches!(
            repo.list_events().await,
            Err(RepoError::Connection(ConnectionError::NotConfigured))
        ));
    }
}
