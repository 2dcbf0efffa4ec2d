//! Direct email endpoints used by the site forms.
//!
//! These render a fixed template and send it synchronously; nothing is
//! stored.

use axum::{extract::State, Json};
use domain::models::notification::{
    FeedbackNotice, SendFeedbackRequest, SendReservationConfirmationRequest,
    SendReservationEmailRequest, SendResponse,
};
use tracing::{error, info};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::services::email_templates::{self, ReservationDetails};
use crate::services::EmailMessage;

fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::Validation(format!("{} is required", field)))
}

async fn deliver(
    state: &AppState,
    kind: &'static str,
    message: EmailMessage,
) -> Result<Json<SendResponse>, ApiError> {
    let to = message.to.clone();
    match state.email.send(message).await {
        Ok(()) => {
            info!(kind, to = %to, "Email sent");
            Ok(Json(SendResponse { ok: true }))
        }
        Err(e) => {
            error!(kind, to = %to, error = %e, "Email send failed");
            Err(ApiError::Internal(format!("{} email failed: {}", kind, e)))
        }
    }
}

/// Email feedback to the organiser.
///
/// POST /api/send-feedback
pub async fn send_feedback(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendFeedbackRequest>,
) -> Result<Json<SendResponse>, ApiError> {
    let notice = FeedbackNotice {
        feedback_id: String::new(),
        name: required(request.name, "name")?,
        email: required(request.email, "email")?,
        message: required(request.message, "message")?,
        photo_url: request.photo_url,
    };

    let message = email_templates::feedback_received(state.email.organizer_email(), &notice);
    deliver(&state, "feedback", message).await
}

/// Email the holder a reservation confirmation, optionally with a payment link.
///
/// POST /api/send-reservation-confirmation
pub async fn send_reservation_confirmation(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendReservationConfirmationRequest>,
) -> Result<Json<SendResponse>, ApiError> {
    let name = required(request.name, "name")?;
    let email = required(request.email, "email")?;
    let event_title = required(request.event_title, "eventTitle")?;
    let details = ReservationDetails {
        name: &name,
        email: &email,
        event_title: &event_title,
        people_count: required(request.people_count, "peopleCount")?,
        reservation_id: request.reservation_id.as_deref(),
        phone: None,
        note: None,
    };

    let message =
        email_templates::reservation_confirmation(&details, request.payment_url.as_deref());
    deliver(&state, "reservation_confirmation", message).await
}

/// Email the organiser a copy of a reservation request.
///
/// POST /api/send-reservation-email
pub async fn send_reservation_email(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendReservationEmailRequest>,
) -> Result<Json<SendResponse>, ApiError> {
    let name = required(request.name, "name")?;
    let email = required(request.email, "email")?;
    let event_title = required(request.event_title, "eventTitle")?;
    let details = ReservationDetails {
        name: &name,
        email: &email,
        event_title: &event_title,
        people_count: required(request.people_count, "peopleCount")?,
        reservation_id: None,
        phone: request.phone.as_deref(),
        note: request.note.as_deref(),
    };

    let message = email_templates::reservation_request(state.email.organizer_email(), &details);
    deliver(&state, "reservation_request", message).await
}
