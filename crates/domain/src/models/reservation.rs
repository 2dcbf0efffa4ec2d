//! Reservation domain model.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payment status of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Waiting for payment; seats are held while `blocked` is set.
    Unpaid,
    /// Paid through the checkout flow.
    Paid,
    /// Hold ran out before payment; seats were released.
    Expired,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
            Self::Expired => "expired",
        }
    }

    /// Paid and expired are terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Unpaid)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            "expired" => Ok(Self::Expired),
            other => Err(format!("Unknown payment status: {}", other)),
        }
    }
}

/// A reservation holding seats on an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    /// Not enforced as a foreign key; the event may have been deleted.
    pub event_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub note: Option<String>,
    pub people_count: i32,
    pub payment_status: PaymentStatus,
    pub blocked: bool,
    /// Hold deadline in unix epoch milliseconds.
    pub reservation_expires_at: i64,
    pub checkout_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub expired_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// True while the reservation still holds seats waiting for payment.
    pub fn is_holding(&self) -> bool {
        self.payment_status == PaymentStatus::Unpaid && self.blocked
    }
}

/// Request payload for submitting a reservation from the public site.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[validate(length(min = 1, max = 100, message = "Event ID is required"))]
    pub event_id: String,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 255, message = "Email too long"))]
    pub email: String,

    #[validate(length(max = 30, message = "Phone number too long"))]
    pub phone: Option<String>,

    #[validate(length(max = 1000, message = "Note too long"))]
    pub note: Option<String>,

    /// Upper bound is checked against configuration by the service.
    #[validate(range(min = 1, message = "At least one person is required"))]
    pub people_count: i32,
}

/// Response returned after a reservation is created.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationResponse {
    pub id: String,
    pub event_id: String,
    pub people_count: i32,
    pub payment_status: PaymentStatus,
    pub reservation_expires_at: i64,
    /// Free seats left on the event after this reservation.
    pub spots_left: i32,
}

/// Public view of a reservation, used by the payment result page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationStatusResponse {
    pub id: String,
    pub event_id: String,
    pub people_count: i32,
    pub payment_status: PaymentStatus,
    pub blocked: bool,
    pub reservation_expires_at: i64,
    pub paid_at: Option<DateTime<Utc>>,
}

impl From<Reservation> for ReservationStatusResponse {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            event_id: reservation.event_id,
            people_count: reservation.people_count,
            payment_status: reservation.payment_status,
            blocked: reservation.blocked,
            reservation_expires_at: reservation.reservation_expires_at,
            paid_at: reservation.paid_at,
        }
    }
}

/// Admin filter for listing reservations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReservationsQuery {
    pub event_id: Option<String>,
    pub payment_status: Option<PaymentStatus>,
}

/// Reservation fields needed when it is inserted.
#[derive(Debug, Clone)]
pub struct NewReservation {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub note: Option<String>,
    pub people_count: i32,
    pub reservation_expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(people_count: i32, email: &str) -> CreateReservationRequest {
        CreateReservationRequest {
            event_id: "deskovky-brno".to_string(),
            name: "Jana Nováková".to_string(),
            email: email.to_string(),
            phone: None,
            note: None,
            people_count,
        }
    }

    #[test]
    fn test_payment_status_display_and_parse() {
        for status in [
            PaymentStatus::Unpaid,
            PaymentStatus::Paid,
            PaymentStatus::Expired,
        ] {
            assert_eq!(status.to_string().parse::<PaymentStatus>(), Ok(status));
        }
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn test_payment_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Expired).unwrap(),
            "\"expired\""
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(!PaymentStatus::Unpaid.is_terminal());
        assert!(PaymentStatus::Paid.is_terminal());
        assert!(PaymentStatus::Expired.is_terminal());
    }

    #[test]
    fn test_create_request_validation() {
        assert!(request(2, "jana@example.com").validate().is_ok());
        assert!(request(0, "jana@example.com").validate().is_err());
        assert!(request(2, "not-an-email").validate().is_err());
    }

    #[test]
    fn test_generated_requests_validate() {
        use fake::faker::internet::en::SafeEmail;
        use fake::faker::name::en::Name;
        use fake::Fake;

        for people in 1..=6 {
            let mut req = request(people, &SafeEmail().fake::<String>());
            req.name = Name().fake();
            assert!(req.validate().is_ok(), "{:?}", req);
        }
    }

    #[test]
    fn test_create_request_rejects_blank_name() {
        let mut req = request(1, "jana@example.com");
        req.name = "   ".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_create_request_deserializes_camel_case() {
        let req: CreateReservationRequest = serde_json::from_value(serde_json::json!({
            "eventId": "quiz",
            "name": "Petr",
            "email": "petr@example.com",
            "peopleCount": 3
        }))
        .unwrap();
        assert_eq!(req.people_count, 3);
        assert!(req.phone.is_none());
    }
}
