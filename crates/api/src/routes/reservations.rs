//! Reservation routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::reservation::{
    CreateReservationRequest, CreateReservationResponse, ListReservationsQuery,
    ReservationStatusResponse,
};
use domain::models::Reservation;
use persistence::repositories::ReservationRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::AdminSession;

/// Place a reservation hold.
///
/// POST /api/reservations
///
/// Takes the seats from the event in the same transaction that stores the
/// reservation. The hold lasts until `reservationExpiresAt` unless paid.
pub async fn create_reservation(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<CreateReservationResponse>), ApiError> {
    let response = state.reservations.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Payment status of a reservation, polled by the payment result page.
///
/// GET /api/reservations/:id
pub async fn get_reservation_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReservationStatusResponse>, ApiError> {
    let reservation = state
        .reservations
        .find(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Reservation not found".into()))?;
    Ok(Json(reservation.into()))
}

/// GET /api/admin/reservations?eventId=&paymentStatus=
pub async fn admin_list_reservations(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(query): Query<ListReservationsQuery>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
    let repo = ReservationRepository::new(state.pool.clone());
    let reservations = repo.list(&query).await?;
    Ok(Json(
        reservations.into_iter().map(Reservation::from).collect(),
    ))
}

/// GET /api/admin/reservations/:id
pub async fn admin_get_reservation(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<Reservation>, ApiError> {
    let reservation = state
        .reservations
        .find(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Reservation not found".into()))?;
    Ok(Json(reservation))
}
