//! Notification outbox entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{NotificationKind, OutboxNotification};

/// Maximum number of delivery attempts before a notification is failed.
pub const MAX_DELIVERY_ATTEMPTS: i32 = 4;

/// Delay before each attempt, indexed by the number of attempts already made.
/// Attempt 1: immediate, attempt 2: 60s, attempt 3: 300s, attempt 4: 900s.
pub const RETRY_BACKOFF_SECONDS: [i64; 4] = [0, 60, 300, 900];

/// Database enum for notification_kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
pub enum NotificationKindDb {
    ReservationCreated,
    ReservationExpired,
    FeedbackReceived,
}

impl From<NotificationKindDb> for NotificationKind {
    fn from(db: NotificationKindDb) -> Self {
        match db {
            NotificationKindDb::ReservationCreated => NotificationKind::ReservationCreated,
            NotificationKindDb::ReservationExpired => NotificationKind::ReservationExpired,
            NotificationKindDb::FeedbackReceived => NotificationKind::FeedbackReceived,
        }
    }
}

impl From<NotificationKind> for NotificationKindDb {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::ReservationCreated => NotificationKindDb::ReservationCreated,
            NotificationKind::ReservationExpired => NotificationKindDb::ReservationExpired,
            NotificationKind::FeedbackReceived => NotificationKindDb::FeedbackReceived,
        }
    }
}

/// Database enum for notification_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "notification_status", rename_all = "lowercase")]
pub enum NotificationStatusDb {
    Pending,
    Sent,
    Failed,
}

/// Database row mapping for the notification_outbox table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: i64,
    pub kind: NotificationKindDb,
    pub recipient: String,
    pub payload: serde_json::Value,
    pub dedup_key: String,
    pub status: NotificationStatusDb,
    pub attempts: i32,
    pub next_attempt_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationEntity> for OutboxNotification {
    fn from(entity: NotificationEntity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind.into(),
            recipient: entity.recipient,
            payload: entity.payload,
            dedup_key: entity.dedup_key,
            attempts: entity.attempts,
            next_attempt_at: entity.next_attempt_at,
            sent_at: entity.sent_at,
            last_error: entity.last_error,
            created_at: entity.created_at,
        }
    }
}

/// Outcome of a failed attempt given the attempts made so far (including it).
///
/// Returns the delay before the next attempt, or `None` once the
/// notification has used up its attempts.
pub fn retry_delay_secs(attempts_made: i32) -> Option<i64> {
    if attempts_made >= MAX_DELIVERY_ATTEMPTS {
        return None;
    }
    let index = attempts_made.clamp(0, RETRY_BACKOFF_SECONDS.len() as i32 - 1) as usize;
    Some(RETRY_BACKOFF_SECONDS[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_constants() {
        assert_eq!(MAX_DELIVERY_ATTEMPTS, 4);
        assert_eq!(RETRY_BACKOFF_SECONDS, [0, 60, 300, 900]);
    }

    #[test]
    fn test_retry_delay_schedule() {
        assert_eq!(retry_delay_secs(1), Some(60));
        assert_eq!(retry_delay_secs(2), Some(300));
        assert_eq!(retry_delay_secs(3), Some(900));
        assert_eq!(retry_delay_secs(4), None);
        assert_eq!(retry_delay_secs(7), None);
    }

    #[test]
    fn test_kind_conversion() {
        for kind in [
            NotificationKind::ReservationCreated,
            NotificationKind::ReservationExpired,
            NotificationKind::FeedbackReceived,
        ] {
            let db: NotificationKindDb = kind.into();
            assert_eq!(NotificationKind::from(db), kind);
        }
    }
}
