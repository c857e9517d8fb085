//! Process-wide connection cache
//!
//! Hot-reloaded or serverless-style hosts call into the data layer many times
//! per process, often concurrently. `ConnectionManager` makes sure that:
//!
//! - at most one connection attempt is in flight at a time
//! - every caller that arrives while an attempt is pending joins that attempt
//!   and sees its outcome (same handle, or same error)
//! - a successful handle is reused for the rest of the process
//! - a failed attempt is forgotten, so the next caller starts over
//!
//! The mutex only guards the start-or-join decision and the transition after
//! the attempt resolves. It is never held across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ConnectionError;

/// Source of database handles.
///
/// Implemented by the Postgres backend and by the in-memory store; tests use
/// their own connectors to count and gate attempts.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Reusable handle. Cloning must be cheap and share the underlying
    /// connection (pool, `Arc`, ...).
    type Handle: Clone + Send + Sync + 'static;

    /// Open a new handle. Only ever called by [`ConnectionManager`].
    async fn connect(&self) -> Result<Self::Handle, ConnectionError>;
}

/// Externally visible cache state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Absent,
    Connecting,
    Established,
}

type Attempt<H> = Shared<BoxFuture<'static, Result<H, ConnectionError>>>;

enum Slot<H> {
    Absent,
    Pending { generation: u64, attempt: Attempt<H> },
    Established(H),
}

struct Inner<H> {
    slot: Slot<H>,
    /// Bumped for every new attempt so a late waiter never overwrites the
    /// outcome of a newer one.
    generation: u64,
}

/// Owns at most one live handle and at most one in-flight attempt.
pub struct ConnectionManager<C: Connector> {
    connector: Arc<C>,
    inner: Mutex<Inner<C::Handle>>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            inner: Mutex::new(Inner {
                slot: Slot::Absent,
                generation: 0,
            }),
        }
    }

    /// The connector this manager draws handles from.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Current cache state (diagnostics only; may be stale immediately).
    pub fn state(&self) -> ConnectionState {
        match self.lock().slot {
            Slot::Absent => ConnectionState::Absent,
            Slot::Pending { .. } => ConnectionState::Connecting,
            Slot::Established(_) => ConnectionState::Established,
        }
    }

    /// Return the shared handle, establishing it on first use.
    ///
    /// # Errors
    ///
    /// - [`ConnectionError::NotConfigured`] if no connection target is set
    /// - [`ConnectionError::Connect`] if the attempt failed
    ///
    /// Neither is cached: the next call starts a fresh attempt.
    pub async fn ensure_connected(&self) -> Result<C::Handle, ConnectionError> {
        let (generation, attempt) = {
            let mut inner = self.lock();
            match &inner.slot {
                Slot::Established(handle) => return Ok(handle.clone()),
                Slot::Pending {
                    generation,
                    attempt,
                } => {
                    debug!(generation, "joining in-flight connection attempt");
                    (*generation, attempt.clone())
                }
                Slot::Absent => {
                    inner.generation += 1;
                    let generation = inner.generation;
                    let connector = Arc::clone(&self.connector);
                    let attempt = async move { connector.connect().await }
                        .boxed()
                        .shared();
                    inner.slot = Slot::Pending {
                        generation,
                        attempt: attempt.clone(),
                    };
                    info!(generation, "starting database connection attempt");
                    (generation, attempt)
                }
            }
        };

        let result = attempt.await;

        let mut inner = self.lock();
        let is_current = matches!(
            &inner.slot,
            Slot::Pending { generation: g, .. } if *g == generation
        );
        if is_current {
            match &result {
                Ok(handle) => {
                    inner.slot = Slot::Established(handle.clone());
                    info!(generation, "database connection established");
                }
                Err(e) => {
                    inner.slot = Slot::Absent;
                    warn!(generation, error = %e, "database connection attempt failed; next call will retry");
                }
            }
        }

        result
    }

    fn lock(&self) -> MutexGuard<'_, Inner<C::Handle>> {
        // The guarded section never panics mid-transition, so a poisoned
        // lock still holds a consistent slot.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
