//! Checkout and payment webhook payloads.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Event type sent by the processor once a hosted checkout is paid.
pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";

/// Metadata key carrying the reservation id through the checkout.
pub const METADATA_RESERVATION_ID: &str = "reservationId";

/// Metadata key carrying the event title through the checkout.
pub const METADATA_EVENT_TITLE: &str = "eventTitle";

/// Request payload for `POST /api/create-checkout-session`.
///
/// Every field is optional at the serde level so that a missing field is
/// reported as a validation error (400) rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    #[validate(required(message = "reservationId is required"))]
    #[validate(length(min = 1, max = 100, message = "reservationId is required"))]
    pub reservation_id: Option<String>,

    #[validate(required(message = "eventTitle is required"))]
    #[validate(length(min = 1, max = 200, message = "eventTitle is required"))]
    pub event_title: Option<String>,

    #[validate(required(message = "price is required"))]
    #[validate(custom(function = "shared::validation::validate_price"))]
    pub price: Option<i32>,

    #[validate(required(message = "peopleCount is required"))]
    #[validate(range(min = 1, message = "peopleCount must be at least 1"))]
    pub people_count: Option<i32>,

    #[validate(required(message = "email is required"))]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Validated checkout input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutInput {
    pub reservation_id: String,
    pub event_title: String,
    pub price: i32,
    pub people_count: i32,
    pub email: String,
}

impl CreateCheckoutSessionRequest {
    /// Returns the fields once all of them are present.
    ///
    /// Call after `validate()`; returns `None` if anything is missing.
    pub fn into_input(self) -> Option<CheckoutInput> {
        Some(CheckoutInput {
            reservation_id: self.reservation_id?,
            event_title: self.event_title?,
            price: self.price?,
            people_count: self.people_count?,
            email: self.email?,
        })
    }
}

impl CheckoutInput {
    /// Unit price in minor currency units (haléře).
    pub fn unit_amount(&self) -> i64 {
        i64::from(self.price) * 100
    }
}

/// Response for a created checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    pub url: String,
}

/// Envelope of a processor webhook event. Only the fields we read.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    pub object: serde_json::Value,
}

/// The checkout session object of a `checkout.session.completed` event.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletedCheckoutSession {
    pub id: String,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CompletedCheckoutSession {
    pub fn reservation_id(&self) -> Option<&str> {
        self.metadata
            .get(METADATA_RESERVATION_ID)
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CreateCheckoutSessionRequest {
        CreateCheckoutSessionRequest {
            reservation_id: Some("r-1".to_string()),
            event_title: Some("Deskovky".to_string()),
            price: Some(250),
            people_count: Some(2),
            email: Some("jana@example.com".to_string()),
        }
    }

    #[test]
    fn test_full_request_is_valid() {
        let req = full_request();
        assert!(req.validate().is_ok());
        let input = req.into_input().unwrap();
        assert_eq!(input.unit_amount(), 25000);
    }

    #[test]
    fn test_missing_email_is_invalid() {
        let req = CreateCheckoutSessionRequest {
            email: None,
            ..full_request()
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_empty_reservation_id_is_invalid() {
        let req = CreateCheckoutSessionRequest {
            reservation_id: Some(String::new()),
            ..full_request()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_zero_people_is_invalid() {
        let req = CreateCheckoutSessionRequest {
            people_count: Some(0),
            ..full_request()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_body_reports_every_field() {
        let errors = CreateCheckoutSessionRequest::default()
            .validate()
            .unwrap_err();
        assert_eq!(errors.field_errors().len(), 5);
    }

    #[test]
    fn test_parse_completed_event() {
        let payload = serde_json::json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {"object": {
                "id": "cs_test_1",
                "payment_status": "paid",
                "metadata": {"reservationId": "r-1", "eventTitle": "Deskovky"}
            }}
        });
        let event: WebhookEvent = serde_json::from_value(payload).unwrap();
        assert_eq!(event.event_type, CHECKOUT_SESSION_COMPLETED);

        let session: CompletedCheckoutSession =
            serde_json::from_value(event.data.object).unwrap();
        assert_eq!(session.reservation_id(), Some("r-1"));
    }

    #[test]
    fn test_session_without_metadata() {
        let session: CompletedCheckoutSession =
            serde_json::from_value(serde_json::json!({"id": "cs_2"})).unwrap();
        assert_eq!(session.reservation_id(), None);
    }
}
