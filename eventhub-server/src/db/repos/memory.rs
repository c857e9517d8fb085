//! In-process event store
//!
//! Backs local runs from a JSON fixture (`eventhub --fixture events.json`) and
//! the repository/HTTP tests. Same semantics as the Postgres store.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use super::EventStore;
use crate::db::Connector;
use crate::error::ConnectionError;
use crate::models::{Event, Slug};

#[derive(Default)]
struct MemoryInner {
    events: RwLock<Vec<Event>>,
    fail_queries: AtomicBool,
}

/// Shared, cloneable in-memory event collection.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

impl MemoryStore {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                events: RwLock::new(events),
                fail_queries: AtomicBool::new(false),
            }),
        }
    }

    /// Load a JSON array of events (camelCase fields).
    pub fn from_json_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let events: Vec<Event> = serde_json::from_str(&raw)?;
        tracing::info!(path = %path.display(), count = events.len(), "loaded event fixture");
        Ok(Self::new(events))
    }

    /// Make every subsequent query fail (or succeed again).
    pub fn set_fail_queries(&self, fail: bool) {
        self.inner.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self) -> Result<(), sqlx::Error> {
        if self.inner.fail_queries.load(Ordering::SeqCst) {
            return Err(sqlx::Error::Protocol("memory store: injected query failure".into()));
        }
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<Event>> {
        self.inner
            .events
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn newest_first(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    events
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn all_newest_first(&self) -> Result<Vec<Event>, sqlx::Error> {
        self.check()?;
        Ok(newest_first(self.read().clone()))
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Event>, sqlx::Error> {
        self.check()?;
        Ok(self
            .read()
            .iter()
            .find(|e| e.slug == slug.as_str())
            .cloned())
    }

    async fn find_sharing_tags(
        &self,
        tags: &[String],
        exclude: Uuid,
    ) -> Result<Vec<Event>, sqlx::Error> {
        self.check()?;
        let matches = self
            .read()
            .iter()
            .filter(|e| e.id != exclude && e.shares_tag_with(tags))
            .cloned()
            .collect();
        Ok(newest_first(matches))
    }
}

/// Hands out one [`MemoryStore`]; never fails.
#[derive(Clone, Default)]
pub struct MemoryConnector {
    store: MemoryStore,
}

impl MemoryConnector {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

#[async_trait]
impl Connector for MemoryConnector {
    type Handle = MemoryStore;

    async fn connect(&self) -> Result<MemoryStore, ConnectionError> {
        Ok(self.store.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Write;

    fn event(slug: &str, tags: &[&str], hour: u32) -> Event {
        Event {
            slug: slug.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap(),
            id: Uuid::new_v4(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn sharing_tags_excludes_by_id() {
        let a = event("a", &["x", "y"], 1);
        let b = event("b", &["y", "z"], 2);
        let store = MemoryStore::new(vec![a.clone(), b.clone()]);

        let found = store.find_sharing_tags(&a.tags, a.id).await.unwrap();
        assert_eq!(found, vec![b]);
    }

    #[tokio::test]
    async fn injected_failure_affects_all_reads() {
        let store = MemoryStore::new(vec![event("a", &["x"], 1)]);
        store.set_fail_queries(true);

        assert!(store.all_newest_first().await.is_err());
        assert!(store.find_by_slug(&Slug::normalize("a")).await.is_err());
        assert!(store.find_sharing_tags(&[], Uuid::nil()).await.is_err());

        store.set_fail_queries(false);
        assert_eq!(store.all_newest_first().await.unwrap().len(), 1);
    }

    #[test]
    fn loads_fixture_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"slug": "rust-conf", "tags": ["rust"], "createdAt": "2025-09-01T10:00:00Z"}},
                {{"slug": "react-summit", "tags": ["web"], "createdAt": "2025-06-01T10:00:00Z"}}
            ]"#
        )
        .unwrap();

        let store = MemoryStore::from_json_file(file.path()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn rejects_malformed_fixture() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = MemoryStore::from_json_file(file.path()).err().unwrap();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn connector_shares_one_store() {
        let connector = MemoryConnector::new(MemoryStore::new(vec![event("a", &[], 1)]));
        let handle = connector.connect().await.unwrap();
        connector.store().set_fail_queries(true);
        assert!(handle.all_newest_first().await.is_err());
    }
}
