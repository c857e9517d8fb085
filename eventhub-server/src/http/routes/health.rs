//! Health check endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::{ConnectionState, Connector, EventStore};
use crate::http::server::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Connection cache state; reporting it never triggers a connection
    pub database: ConnectionState,
}

/// GET /health
async fn health<C>(State(state): State<Arc<AppState<C>>>) -> Json<HealthResponse>
where
    C: Connector,
    C::Handle: EventStore,
{
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        database: state.events.connections().state(),
    })
}

/// Health routes
pub fn router<C>() -> Router<Arc<AppState<C>>>
where
    C: Connector,
    C::Handle: EventStore,
{
    Router::new().route("/health", get(health::<C>))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ConnectionManager, MemoryConnector};
    use crate::repository::EventRepository;

    #[tokio::test]
    async fn health_reports_without_connecting() {
        let manager = Arc::new(ConnectionManager::new(MemoryConnector::default()));
        let state = Arc::new(AppState {
            events: EventRepository::new(manager),
        });

        let Json(body) = health(State(Arc::clone(&state))).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.database, ConnectionState::Absent);
        assert_eq!(state.events.connections().state(), ConnectionState::Absent);
    }
}
