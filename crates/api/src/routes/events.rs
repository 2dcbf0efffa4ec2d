//! Event routes: public listing and admin management.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use domain::models::event::{
    CreateEventRequest, EventResponse, ListEventsQuery, UpdateEventRequest,
};
use domain::models::Event;
use persistence::repositories::{EventInput, EventPatch, EventRepository};
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::AdminSession;

fn to_response(entity: persistence::entities::EventEntity) -> EventResponse {
    EventResponse::from_event(Event::from(entity), Utc::now())
}

/// List upcoming events.
///
/// GET /api/events?includeArchived=bool
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let events = repo.list(query.include_archived).await?;
    Ok(Json(events.into_iter().map(to_response).collect()))
}

/// Get one event.
///
/// GET /api/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventResponse>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let event = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;
    Ok(Json(to_response(event)))
}

/// List every event, archived included.
///
/// GET /api/admin/events
pub async fn admin_list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let events = repo.list(true).await?;
    Ok(Json(events.into_iter().map(to_response).collect()))
}

/// Create an event.
///
/// POST /api/admin/events
///
/// Uses the supplied id when present, a UUID otherwise. Spots default to
/// the capacity.
pub async fn create_event(
    State(state): State<AppState>,
    session: AdminSession,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let input = EventInput {
        id: request
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        spots: request.initial_spots(),
        title: request.title.trim().to_string(),
        description: request.description,
        date: request.date,
        location: request.location.trim().to_string(),
        capacity: request.capacity,
        price: request.price,
        photos: request.photos,
    };

    let repo = EventRepository::new(state.pool.clone());
    let event = repo.create(&input).await.map_err(|e| match ApiError::from(e) {
        ApiError::Conflict(_) => ApiError::Conflict(format!("Event {} already exists", input.id)),
        other => other,
    })?;

    info!(
        event_id = %event.id,
        capacity = event.capacity,
        session = %session.jti,
        "Event created"
    );

    Ok((StatusCode::CREATED, Json(to_response(event))))
}

/// Update an event. Missing fields are left unchanged.
///
/// PATCH /api/admin/events/:id
///
/// A capacity change moves the free spots by the same delta, never below 0.
pub async fn update_event(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateEventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let patch = EventPatch {
        title: request.title.map(|t| t.trim().to_string()),
        description: request.description,
        date: request.date,
        location: request.location.map(|l| l.trim().to_string()),
        capacity: request.capacity,
        price: request.price,
        photos: request.photos,
        archived: request.archived,
    };

    let repo = EventRepository::new(state.pool.clone());
    let event = repo
        .update(&id, &patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    info!(
        event_id = %event.id,
        capacity = event.capacity,
        spots = event.spots,
        session = %session.jti,
        "Event updated"
    );

    Ok(Json(to_response(event)))
}

/// Delete an event. Its reservations are kept.
///
/// DELETE /api/admin/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    if repo.delete(&id).await? == 0 {
        return Err(ApiError::NotFound("Event not found".into()));
    }

    info!(event_id = %id, session = %session.jti, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Archive an event.
///
/// POST /api/admin/events/:id/archive
pub async fn archive_event(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<EventResponse>, ApiError> {
    let repo = EventRepository::new(state.pool.clone());
    let event = repo
        .archive(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;

    info!(event_id = %event.id, session = %session.jti, "Event archived");
    Ok(Json(to_response(event)))
}
