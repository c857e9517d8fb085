//! Event endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::db::{Connector, EventStore};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::{Event, Slug};

/// Single event response
#[derive(Serialize)]
pub struct EventResponse {
    pub message: &'static str,
    pub event: Event,
}

/// Event list response
#[derive(Serialize)]
pub struct EventListResponse {
    pub message: &'static str,
    pub events: Vec<Event>,
}

/// GET /api/events - every event, newest first
async fn list_events<C>(
    State(state): State<Arc<AppState<C>>>,
) -> Result<Json<EventListResponse>, ApiError>
where
    C: Connector,
    C::Handle: EventStore,
{
    let events = state
        .events
        .list_events()
        .await
        .map_err(ApiError::failed("Failed to fetch events"))?;

    Ok(Json(EventListResponse {
        message: "Events fetched successfully",
        events,
    }))
}

/// GET /api/events/{slug} - one event by slug
///
/// Uses the fallible lookup so a failed query is a 500, not a 404.
async fn get_event<C>(
    State(state): State<Arc<AppState<C>>>,
    Path(raw): Path<String>,
) -> Result<Json<EventResponse>, ApiError>
where
    C: Connector,
    C::Handle: EventStore,
{
    let slug = Slug::parse(&raw)?;

    let found = state
        .events
        .try_get_by_slug(slug.as_str())
        .await
        .map_err(ApiError::failed("Failed to fetch event"))?;

    let Some(event) = found else {
        return Err(ApiError::NotFound { slug });
    };

    Ok(Json(EventResponse {
        message: "Event fetched successfully",
        event,
    }))
}

/// GET /api/events/{slug}/similar - events sharing a tag
async fn similar_events<C>(
    State(state): State<Arc<AppState<C>>>,
    Path(raw): Path<String>,
) -> Result<Json<EventListResponse>, ApiError>
where
    C: Connector,
    C::Handle: EventStore,
{
    let slug = Slug::parse(&raw)?;
    let events = state.events.get_similar_by_slug(slug.as_str()).await?;

    Ok(Json(EventListResponse {
        message: "Similar events fetched successfully",
        events,
    }))
}

/// Event routes
pub fn router<C>() -> Router<Arc<AppState<C>>>
where
    C: Connector,
    C::Handle: EventStore,
{
    Router::new()
        .route("/api/events", get(list_events::<C>))
        .route("/api/events/{slug}", get(get_event::<C>))
        .route("/api/events/{slug}/similar", get(similar_events::<C>))
}
