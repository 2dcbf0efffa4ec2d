//! Reservation repository.
//!
//! Every write that moves seats runs in one transaction together with the
//! capacity change and the outbox notification. State changes lock the
//! reservation row and are checked against the lifecycle rules in
//! `domain::services::reservation_policy`, so a repeated or concurrent call
//! finds nothing to do.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use domain::models::notification::{NewNotification, ReservationNotice};
use domain::models::reservation::{ListReservationsQuery, NewReservation};
use domain::services::{
    spots_after_release, HoldPolicy, ReservationState, SeatRestorePolicy, TransitionError,
};

use crate::entities::{PaymentStatusDb, ReservationEntity, StaleHoldEntity};
use crate::metrics::QueryTimer;
use crate::repositories::notification::NotificationRepository;

const RESERVATION_COLUMNS: &str = "id, event_id, name, email, phone, note, people_count, \
                                   payment_status, blocked, reservation_expires_at, \
                                   checkout_session_id, created_at, paid_at, expired_at";

/// Result of trying to place a hold.
#[derive(Debug)]
pub enum HoldOutcome {
    Created {
        reservation: ReservationEntity,
        spots_left: i32,
    },
    EventNotFound,
    /// The event is archived or already took place.
    EventClosed,
    InsufficientSpots {
        available: i32,
    },
}

/// An expired hold and the seats given back for it.
#[derive(Debug, Clone)]
pub struct ExpiredHold {
    pub reservation_id: String,
    pub event_id: String,
    pub restored_seats: i32,
    /// Spots after the release; `None` when the event no longer exists.
    pub spots_after: Option<i32>,
    pub notified: bool,
}

/// Result of trying to expire one hold.
#[derive(Debug)]
pub enum ExpireOutcome {
    Expired(ExpiredHold),
    /// The reservation is not an expirable hold; nothing was changed.
    Skipped(TransitionError),
    NotFound,
}

/// Result of applying a confirmed payment.
#[derive(Debug)]
pub enum PaymentOutcome {
    Paid(ReservationEntity),
    AlreadyPaid,
    /// Payment arrived after the hold expired; needs a manual refund.
    Expired,
    /// Unpaid but no longer blocked; nothing to convert.
    NotHolding,
    NotFound,
}

impl From<TransitionError> for PaymentOutcome {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::AlreadyPaid => Self::AlreadyPaid,
            TransitionError::AlreadyExpired => Self::Expired,
            TransitionError::NotHolding | TransitionError::HoldActive => Self::NotHolding,
        }
    }
}

/// Row lock on a reservation's lifecycle columns.
#[derive(sqlx::FromRow)]
struct LockedReservation {
    event_id: String,
    name: String,
    email: String,
    people_count: i32,
    payment_status: PaymentStatusDb,
    blocked: bool,
    reservation_expires_at: i64,
}

impl LockedReservation {
    fn state(&self) -> ReservationState {
        ReservationState {
            status: self.payment_status.into(),
            blocked: self.blocked,
        }
    }
}

/// Repository for reservation operations.
#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Creates a new ReservationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Place a hold: take the seats, insert the reservation and queue the
    /// confirmation email, all in one transaction.
    ///
    /// The seat decrement is guarded by `spots >= people_count`, so
    /// concurrent holds can never overbook an event.
    pub async fn create_hold(&self, new: &NewReservation) -> Result<HoldOutcome, sqlx::Error> {
        let timer = QueryTimer::new("create_reservation_hold");
        let mut tx = self.pool.begin().await?;

        let taken: Option<(i32, String)> = sqlx::query_as(
            r#"
            UPDATE events
            SET spots = spots - $2, updated_at = NOW()
            WHERE id = $1 AND spots >= $2 AND NOT archived AND date >= NOW()
            RETURNING spots, title
            "#,
        )
        .bind(&new.event_id)
        .bind(new.people_count)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((spots_left, event_title)) = taken else {
            let event: Option<(i32, bool, DateTime<Utc>)> =
                sqlx::query_as("SELECT spots, archived, date FROM events WHERE id = $1")
                    .bind(&new.event_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            tx.rollback().await?;
            timer.record();

            return Ok(match event {
                None => HoldOutcome::EventNotFound,
                Some((_, archived, date)) if archived || date < Utc::now() => {
                    HoldOutcome::EventClosed
                }
                Some((spots, _, _)) => HoldOutcome::InsufficientSpots { available: spots },
            });
        };

        let query = format!(
            r#"
            INSERT INTO reservations
                (id, event_id, name, email, phone, note, people_count,
                 payment_status, blocked, reservation_expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'unpaid', TRUE, $8)
            RETURNING {}
            "#,
            RESERVATION_COLUMNS
        );
        let reservation = sqlx::query_as::<_, ReservationEntity>(&query)
            .bind(&new.id)
            .bind(&new.event_id)
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.phone)
            .bind(&new.note)
            .bind(new.people_count)
            .bind(new.reservation_expires_at)
            .fetch_one(&mut *tx)
            .await?;

        let notice = ReservationNotice {
            reservation_id: reservation.id.clone(),
            name: reservation.name.clone(),
            event_title,
            people_count: reservation.people_count,
            expires_at: Some(reservation.reservation_expires_at),
        };
        NotificationRepository::enqueue_with(
            &mut *tx,
            &NewNotification::reservation_created(&reservation.email, &notice),
        )
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(HoldOutcome::Created {
            reservation,
            spots_left,
        })
    }

    /// Find a reservation by ID.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<ReservationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_reservation_by_id");
        let query = format!(
            "SELECT {} FROM reservations WHERE id = $1",
            RESERVATION_COLUMNS
        );
        let result = sqlx::query_as::<_, ReservationEntity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List reservations, newest first, optionally filtered.
    pub async fn list(
        &self,
        filter: &ListReservationsQuery,
    ) -> Result<Vec<ReservationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_reservations");
        let query = format!(
            r#"
            SELECT {}
            FROM reservations
            WHERE ($1::TEXT IS NULL OR event_id = $1)
              AND ($2::payment_status IS NULL OR payment_status = $2)
            ORDER BY created_at DESC
            "#,
            RESERVATION_COLUMNS
        );
        let result = sqlx::query_as::<_, ReservationEntity>(&query)
            .bind(&filter.event_id)
            .bind(filter.payment_status.map(PaymentStatusDb::from))
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Find unpaid holds whose deadline (epoch ms) is before `now_ms`.
    pub async fn find_stale_holds(
        &self,
        now_ms: i64,
        limit: i64,
    ) -> Result<Vec<StaleHoldEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_stale_holds");
        let result = sqlx::query_as::<_, StaleHoldEntity>(
            r#"
            SELECT r.id, r.event_id, r.name, r.email, r.people_count,
                   r.reservation_expires_at, e.title AS event_title
            FROM reservations r
            LEFT JOIN events e ON e.id = r.event_id
            WHERE r.payment_status = 'unpaid'
              AND r.blocked
              AND r.reservation_expires_at < $1
            ORDER BY r.reservation_expires_at ASC
            LIMIT $2
            "#,
        )
        .bind(now_ms)
        .bind(limit)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    async fn lock_reservation(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: &str,
    ) -> Result<Option<LockedReservation>, sqlx::Error> {
        sqlx::query_as::<_, LockedReservation>(
            r#"
            SELECT event_id, name, email, people_count, payment_status, blocked,
                   reservation_expires_at
            FROM reservations
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Expire one stale hold and give its seats back.
    ///
    /// The reservation row is locked first, so a concurrent sweep or payment
    /// waits and then sees the new state. A reservation that is not an
    /// expirable hold at `now` is left untouched and no email is queued.
    pub async fn expire_hold(
        &self,
        id: &str,
        now: DateTime<Utc>,
        policy: SeatRestorePolicy,
    ) -> Result<ExpireOutcome, sqlx::Error> {
        let timer = QueryTimer::new("expire_reservation_hold");
        let mut tx = self.pool.begin().await?;

        let Some(locked) = Self::lock_reservation(&mut tx, id).await? else {
            tx.rollback().await?;
            timer.record();
            return Ok(ExpireOutcome::NotFound);
        };

        let next = match HoldPolicy::check_expirable(
            locked.state(),
            locked.reservation_expires_at,
            now,
        ) {
            Ok(next) => next,
            Err(reason) => {
                tx.rollback().await?;
                timer.record();
                return Ok(ExpireOutcome::Skipped(reason));
            }
        };

        sqlx::query(
            r#"
            UPDATE reservations
            SET payment_status = $2, blocked = $3, expired_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(PaymentStatusDb::from(next.status))
        .bind(next.blocked)
        .execute(&mut *tx)
        .await?;

        let restored_seats = policy.seats_to_restore(locked.people_count);

        // Deleted events are tolerated: the hold still expires.
        let event: Option<(i32, i32, String)> =
            sqlx::query_as("SELECT spots, capacity, title FROM events WHERE id = $1 FOR UPDATE")
                .bind(&locked.event_id)
                .fetch_optional(&mut *tx)
                .await?;

        let (spots_after, event_title) = match event {
            Some((spots, capacity, title)) => {
                let spots_after = spots_after_release(spots, capacity, restored_seats);
                sqlx::query("UPDATE events SET spots = $2, updated_at = NOW() WHERE id = $1")
                    .bind(&locked.event_id)
                    .bind(spots_after)
                    .execute(&mut *tx)
                    .await?;
                (Some(spots_after), title)
            }
            None => {
                tracing::warn!(
                    reservation_id = %id,
                    event_id = %locked.event_id,
                    "Expired hold references a deleted event, no seats released"
                );
                (None, locked.event_id.clone())
            }
        };

        let notice = ReservationNotice {
            reservation_id: id.to_string(),
            name: locked.name,
            event_title,
            people_count: locked.people_count,
            expires_at: None,
        };
        let notified = NotificationRepository::enqueue_with(
            &mut *tx,
            &NewNotification::reservation_expired(&locked.email, &notice),
        )
        .await?;

        tx.commit().await?;
        timer.record();

        Ok(ExpireOutcome::Expired(ExpiredHold {
            reservation_id: id.to_string(),
            event_id: locked.event_id,
            restored_seats,
            spots_after,
            notified,
        }))
    }

    /// Apply a confirmed payment: unpaid+blocked becomes paid+unblocked.
    ///
    /// The seats stay consumed. Calling this again for the same reservation
    /// reports `AlreadyPaid` without changing anything.
    pub async fn mark_paid(
        &self,
        id: &str,
        checkout_session_id: Option<&str>,
    ) -> Result<PaymentOutcome, sqlx::Error> {
        let timer = QueryTimer::new("mark_reservation_paid");
        let mut tx = self.pool.begin().await?;

        let Some(locked) = Self::lock_reservation(&mut tx, id).await? else {
            tx.rollback().await?;
            timer.record();
            return Ok(PaymentOutcome::NotFound);
        };

        let next = match locked.state().pay() {
            Ok(next) => next,
            Err(reason) => {
                tx.rollback().await?;
                timer.record();
                return Ok(reason.into());
            }
        };

        let query = format!(
            r#"
            UPDATE reservations
            SET payment_status = $2,
                blocked = $3,
                paid_at = NOW(),
                checkout_session_id = COALESCE($4, checkout_session_id)
            WHERE id = $1
            RETURNING {}
            "#,
            RESERVATION_COLUMNS
        );
        let reservation = sqlx::query_as::<_, ReservationEntity>(&query)
            .bind(id)
            .bind(PaymentStatusDb::from(next.status))
            .bind(next.blocked)
            .bind(checkout_session_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        timer.record();
        Ok(PaymentOutcome::Paid(reservation))
    }

    /// Store the checkout session created for a hold.
    ///
    /// Returns the number of rows updated (0 if the hold is gone).
    pub async fn attach_checkout_session(
        &self,
        id: &str,
        checkout_session_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("attach_checkout_session");
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET checkout_session_id = $2
            WHERE id = $1 AND payment_status = 'unpaid' AND blocked
            "#,
        )
        .bind(id)
        .bind(checkout_session_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
