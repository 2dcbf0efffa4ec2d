//! Card payment routes: hosted checkout creation and the processor webhook.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use domain::models::payment::{
    CheckoutSessionResponse, CompletedCheckoutSession, CreateCheckoutSessionRequest,
    WebhookEvent, CHECKOUT_SESSION_COMPLETED,
};
use persistence::repositories::EventRepository;
use tracing::{debug, error, info, warn};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::metrics;
use crate::services::webhook_signature::{self, SIGNATURE_HEADER};
use crate::services::CheckoutSessionParams;

/// Open a hosted checkout page for a held reservation.
///
/// POST /api/create-checkout-session
///
/// Every field is checked before the processor is contacted. The amount
/// must match the listed event price for the reserved party size.
pub async fn create_checkout_session(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateCheckoutSessionRequest>,
) -> Result<Json<CheckoutSessionResponse>, ApiError> {
    let input = request
        .into_input()
        .ok_or_else(|| ApiError::Validation("Missing required fields".into()))?;

    let reservation = state
        .reservations
        .find(&input.reservation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Reservation not found".into()))?;
    if !reservation.is_holding() {
        return Err(ApiError::Conflict(
            "Reservation is no longer awaiting payment".into(),
        ));
    }
    if reservation.people_count != input.people_count {
        return Err(ApiError::Validation(
            "peopleCount does not match the reservation".into(),
        ));
    }

    let event = EventRepository::new(state.pool.clone())
        .find_by_id(&reservation.event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Event not found".into()))?;
    if event.price != input.price {
        return Err(ApiError::Validation(
            "price does not match the event price".into(),
        ));
    }

    let payments = &state.config.payments;
    let params = CheckoutSessionParams {
        unit_amount: input.unit_amount(),
        quantity: input.people_count,
        currency: payments.currency.clone(),
        customer_email: input.email,
        success_url: payments.success_url(&input.reservation_id),
        cancel_url: payments.cancel_url(&input.reservation_id),
        event_title: input.event_title,
        reservation_id: input.reservation_id,
    };

    let session = match state.payments.create_checkout_session(&params).await {
        Ok(session) => session,
        Err(e) => {
            metrics::record_checkout_session(false);
            return Err(ApiError::Internal(format!(
                "Checkout session for reservation {} failed: {}",
                params.reservation_id, e
            )));
        }
    };
    let url = session.url.clone().ok_or_else(|| {
        metrics::record_checkout_session(false);
        ApiError::Internal(format!("Checkout session {} has no url", session.id))
    })?;
    metrics::record_checkout_session(true);

    // The hold may have expired while the processor was answering.
    if !state
        .reservations
        .attach_checkout_session(&params.reservation_id, &session.id)
        .await?
    {
        return Err(ApiError::Conflict(
            "Reservation is no longer awaiting payment".into(),
        ));
    }

    info!(
        reservation_id = %params.reservation_id,
        checkout_session_id = %session.id,
        amount = params.unit_amount * i64::from(params.quantity),
        "Checkout session created"
    );

    Ok(Json(CheckoutSessionResponse { url }))
}

fn webhook_error(message: impl std::fmt::Display) -> Response {
    (StatusCode::BAD_REQUEST, format!("Webhook Error: {}", message)).into_response()
}

/// Payment processor webhook.
///
/// POST /api/stripe-webhook
///
/// The raw body is verified before it is parsed. Answers plain text `OK`
/// for every verified event that needs no retry; a store failure answers
/// 500 so the processor delivers it again.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    if let Err(e) = webhook_signature::verify(
        &body,
        signature,
        &state.config.payments.webhook_secret,
        state.config.payments.signature_tolerance_secs,
        Utc::now().timestamp(),
    ) {
        warn!(error = %e, "Rejected webhook with bad signature");
        return webhook_error(e);
    }

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => return webhook_error(e),
    };

    if event.event_type != CHECKOUT_SESSION_COMPLETED {
        debug!(event_id = %event.id, event_type = %event.event_type, "Ignoring webhook event");
        return (StatusCode::OK, "OK").into_response();
    }

    let session: CompletedCheckoutSession = match serde_json::from_value(event.data.object) {
        Ok(session) => session,
        Err(e) => return webhook_error(e),
    };

    if session
        .payment_status
        .as_deref()
        .is_some_and(|status| status != "paid")
    {
        info!(
            checkout_session_id = %session.id,
            payment_status = ?session.payment_status,
            "Checkout completed without payment, waiting for async confirmation"
        );
        return (StatusCode::OK, "OK").into_response();
    }

    let Some(reservation_id) = session.reservation_id() else {
        warn!(
            event_id = %event.id,
            checkout_session_id = %session.id,
            "Completed checkout without reservationId metadata"
        );
        return (StatusCode::OK, "OK").into_response();
    };

    match state
        .reservations
        .apply_payment(reservation_id, Some(&session.id))
        .await
    {
        Ok(_) => (StatusCode::OK, "OK").into_response(),
        Err(e) => {
            error!(
                reservation_id = %reservation_id,
                event_id = %event.id,
                error = %e,
                "Failed to apply payment"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Webhook Error: storage failure").into_response()
        }
    }
}
