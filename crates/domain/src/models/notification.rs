//! Email notifications: outbox records and direct-send payloads.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Kind of a queued notification. Determines the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Sent to the holder right after a reservation is created.
    ReservationCreated,
    /// Sent to the holder when an unpaid hold runs out.
    ReservationExpired,
    /// Sent to the organiser when feedback is submitted.
    FeedbackReceived,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReservationCreated => "reservation_created",
            Self::ReservationExpired => "reservation_expired",
            Self::FeedbackReceived => "feedback_received",
        }
    }

    /// Deduplication key for the record that triggered the notification.
    pub fn dedup_key(&self, subject_id: &str) -> String {
        match self {
            Self::ReservationCreated => format!("reservation-created:{}", subject_id),
            Self::ReservationExpired => format!("reservation-expired:{}", subject_id),
            Self::FeedbackReceived => format!("feedback:{}", subject_id),
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reservation_created" => Ok(Self::ReservationCreated),
            "reservation_expired" => Ok(Self::ReservationExpired),
            "feedback_received" => Ok(Self::FeedbackReceived),
            other => Err(format!("Unknown notification kind: {}", other)),
        }
    }
}

/// Template data for reservation notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationNotice {
    pub reservation_id: String,
    pub name: String,
    pub event_title: String,
    pub people_count: i32,
    /// Hold deadline in epoch milliseconds (created notices only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// Template data for feedback notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackNotice {
    pub feedback_id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// A notification waiting in (or delivered from) the outbox.
#[derive(Debug, Clone)]
pub struct OutboxNotification {
    pub id: i64,
    pub kind: NotificationKind,
    pub recipient: String,
    pub payload: serde_json::Value,
    pub dedup_key: String,
    pub attempts: i32,
    pub next_attempt_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A notification to be enqueued.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: NotificationKind,
    pub recipient: String,
    pub payload: serde_json::Value,
    pub dedup_key: String,
}

impl NewNotification {
    pub fn reservation_created(email: &str, notice: &ReservationNotice) -> Self {
        Self::build(
            NotificationKind::ReservationCreated,
            email,
            &notice.reservation_id,
            notice,
        )
    }

    pub fn reservation_expired(email: &str, notice: &ReservationNotice) -> Self {
        Self::build(
            NotificationKind::ReservationExpired,
            email,
            &notice.reservation_id,
            notice,
        )
    }

    pub fn feedback_received(organizer_email: &str, notice: &FeedbackNotice) -> Self {
        Self::build(
            NotificationKind::FeedbackReceived,
            organizer_email,
            &notice.feedback_id,
            notice,
        )
    }

    fn build<T: Serialize>(
        kind: NotificationKind,
        recipient: &str,
        subject_id: &str,
        payload: &T,
    ) -> Self {
        Self {
            kind,
            recipient: recipient.to_string(),
            payload: serde_json::to_value(payload).unwrap_or(serde_json::Value::Null),
            dedup_key: kind.dedup_key(subject_id),
        }
    }
}

/// Response of the direct-send endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResponse {
    pub ok: bool,
}

/// Request payload for `POST /api/send-feedback`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendFeedbackRequest {
    #[validate(required(message = "name is required"))]
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: Option<String>,

    #[validate(required(message = "email is required"))]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(required(message = "message is required"))]
    #[validate(length(min = 1, max = 5000, message = "message is required"))]
    pub message: Option<String>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub photo_url: Option<String>,
}

/// Request payload for `POST /api/send-reservation-confirmation`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendReservationConfirmationRequest {
    #[validate(required(message = "name is required"))]
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: Option<String>,

    #[validate(required(message = "email is required"))]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(required(message = "eventTitle is required"))]
    #[validate(length(min = 1, max = 200, message = "eventTitle is required"))]
    pub event_title: Option<String>,

    #[validate(required(message = "peopleCount is required"))]
    #[validate(range(min = 1, message = "peopleCount must be at least 1"))]
    pub people_count: Option<i32>,

    pub reservation_id: Option<String>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub payment_url: Option<String>,
}

/// Request payload for `POST /api/send-reservation-email` (organiser copy).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendReservationEmailRequest {
    #[validate(required(message = "name is required"))]
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: Option<String>,

    #[validate(required(message = "email is required"))]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(required(message = "eventTitle is required"))]
    #[validate(length(min = 1, max = 200, message = "eventTitle is required"))]
    pub event_title: Option<String>,

    #[validate(required(message = "peopleCount is required"))]
    #[validate(range(min = 1, message = "peopleCount must be at least 1"))]
    pub people_count: Option<i32>,

    #[validate(length(max = 30, message = "Phone number too long"))]
    pub phone: Option<String>,

    #[validate(length(max = 1000, message = "Note too long"))]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keys() {
        assert_eq!(
            NotificationKind::ReservationCreated.dedup_key("r1"),
            "reservation-created:r1"
        );
        assert_eq!(
            NotificationKind::ReservationExpired.dedup_key("r1"),
            "reservation-expired:r1"
        );
        assert_eq!(
            NotificationKind::FeedbackReceived.dedup_key("f1"),
            "feedback:f1"
        );
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            NotificationKind::ReservationCreated,
            NotificationKind::ReservationExpired,
            NotificationKind::FeedbackReceived,
        ] {
            assert_eq!(kind.as_str().parse::<NotificationKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_new_notification_payload() {
        let notice = ReservationNotice {
            reservation_id: "r1".to_string(),
            name: "Jana".to_string(),
            event_title: "Deskovky".to_string(),
            people_count: 2,
            expires_at: Some(1_700_000_000_000),
        };
        let n = NewNotification::reservation_created("jana@example.com", &notice);

        assert_eq!(n.kind, NotificationKind::ReservationCreated);
        assert_eq!(n.dedup_key, "reservation-created:r1");
        assert_eq!(n.payload["peopleCount"], 2);

        let back: ReservationNotice = serde_json::from_value(n.payload).unwrap();
        assert_eq!(back, notice);
    }

    #[test]
    fn test_send_feedback_requires_fields() {
        let errors = SendFeedbackRequest::default().validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("message"));
        assert!(!fields.contains_key("photo_url"));
    }

    #[test]
    fn test_send_confirmation_optional_fields() {
        let req: SendReservationConfirmationRequest = serde_json::from_value(serde_json::json!({
            "name": "Jana",
            "email": "jana@example.com",
            "eventTitle": "Deskovky",
            "peopleCount": 2
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.payment_url.is_none());
    }
}
