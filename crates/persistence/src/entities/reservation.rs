//! Reservation entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{PaymentStatus, Reservation};

/// Database enum for payment_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
pub enum PaymentStatusDb {
    Unpaid,
    Paid,
    Expired,
}

impl From<PaymentStatusDb> for PaymentStatus {
    fn from(db: PaymentStatusDb) -> Self {
        match db {
            PaymentStatusDb::Unpaid => PaymentStatus::Unpaid,
            PaymentStatusDb::Paid => PaymentStatus::Paid,
            PaymentStatusDb::Expired => PaymentStatus::Expired,
        }
    }
}

impl From<PaymentStatus> for PaymentStatusDb {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Unpaid => PaymentStatusDb::Unpaid,
            PaymentStatus::Paid => PaymentStatusDb::Paid,
            PaymentStatus::Expired => PaymentStatusDb::Expired,
        }
    }
}

/// Database row mapping for the reservations table.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationEntity {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub note: Option<String>,
    pub people_count: i32,
    pub payment_status: PaymentStatusDb,
    pub blocked: bool,
    pub reservation_expires_at: i64,
    pub checkout_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub expired_at: Option<DateTime<Utc>>,
}

impl From<ReservationEntity> for Reservation {
    fn from(entity: ReservationEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            name: entity.name,
            email: entity.email,
            phone: entity.phone,
            note: entity.note,
            people_count: entity.people_count,
            payment_status: entity.payment_status.into(),
            blocked: entity.blocked,
            reservation_expires_at: entity.reservation_expires_at,
            checkout_session_id: entity.checkout_session_id,
            created_at: entity.created_at,
            paid_at: entity.paid_at,
            expired_at: entity.expired_at,
        }
    }
}

/// A stale hold joined with its event title, as found by the expiry sweep.
#[derive(Debug, Clone, FromRow)]
pub struct StaleHoldEntity {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: String,
    pub people_count: i32,
    pub reservation_expires_at: i64,
    /// None when the event has been deleted.
    pub event_title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_conversion() {
        for status in [
            PaymentStatus::Unpaid,
            PaymentStatus::Paid,
            PaymentStatus::Expired,
        ] {
            let db: PaymentStatusDb = status.into();
            assert_eq!(PaymentStatus::from(db), status);
        }
    }

    #[test]
    fn test_entity_to_domain() {
        let entity = ReservationEntity {
            id: "r-1".to_string(),
            event_id: "quiz".to_string(),
            name: "Jana".to_string(),
            email: "jana@example.com".to_string(),
            phone: None,
            note: Some("vegetarián".to_string()),
            people_count: 2,
            payment_status: PaymentStatusDb::Unpaid,
            blocked: true,
            reservation_expires_at: 1_700_000_000_000,
            checkout_session_id: None,
            created_at: Utc::now(),
            paid_at: None,
            expired_at: None,
        };

        let reservation: Reservation = entity.into();
        assert_eq!(reservation.payment_status, PaymentStatus::Unpaid);
        assert!(reservation.is_holding());
    }
}
