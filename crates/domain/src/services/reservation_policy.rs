//! Reservation lifecycle rules.
//!
//! A reservation starts as `unpaid` with its seats held (`blocked`). From
//! there it either becomes `paid` or, once the hold deadline passes,
//! `expired` with its seats released. Both outcomes are terminal.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::reservation::PaymentStatus;

/// Default hold length before an unpaid reservation expires.
pub const DEFAULT_HOLD_MINUTES: i64 = 30;

/// Rejected lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Reservation is already paid")]
    AlreadyPaid,

    #[error("Reservation has already expired")]
    AlreadyExpired,

    #[error("Reservation is not holding any seats")]
    NotHolding,

    #[error("Reservation hold has not run out yet")]
    HoldActive,
}

/// Payment status together with the seat hold flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationState {
    pub status: PaymentStatus,
    pub blocked: bool,
}

impl ReservationState {
    /// State of a freshly created reservation.
    pub const fn new_hold() -> Self {
        Self {
            status: PaymentStatus::Unpaid,
            blocked: true,
        }
    }

    fn check_holding(&self) -> Result<(), TransitionError> {
        match (self.status, self.blocked) {
            (PaymentStatus::Paid, _) => Err(TransitionError::AlreadyPaid),
            (PaymentStatus::Expired, _) => Err(TransitionError::AlreadyExpired),
            (PaymentStatus::Unpaid, false) => Err(TransitionError::NotHolding),
            (PaymentStatus::Unpaid, true) => Ok(()),
        }
    }

    /// unpaid+blocked -> paid. The seats stay consumed; the hold is released.
    pub fn pay(self) -> Result<Self, TransitionError> {
        self.check_holding()?;
        Ok(Self {
            status: PaymentStatus::Paid,
            blocked: false,
        })
    }

    /// unpaid+blocked -> expired+unblocked.
    pub fn expire(self) -> Result<Self, TransitionError> {
        self.check_holding()?;
        Ok(Self {
            status: PaymentStatus::Expired,
            blocked: false,
        })
    }
}

/// How many seats an expired reservation gives back to its event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatRestorePolicy {
    /// Restore the full party size that was taken.
    #[default]
    PartySize,
    /// Restore exactly one seat, whatever the party size.
    SingleSeat,
}

impl SeatRestorePolicy {
    pub fn seats_to_restore(&self, people_count: i32) -> i32 {
        match self {
            Self::PartySize => people_count.max(0),
            Self::SingleSeat => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PartySize => "party_size",
            Self::SingleSeat => "single_seat",
        }
    }
}

impl std::fmt::Display for SeatRestorePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Free spots after releasing `restored` seats, never above capacity.
pub fn spots_after_release(spots: i32, capacity: i32, restored: i32) -> i32 {
    spots.saturating_add(restored.max(0)).min(capacity)
}

/// Hold deadline rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldPolicy {
    hold: Duration,
}

impl Default for HoldPolicy {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_HOLD_MINUTES)
    }
}

impl HoldPolicy {
    pub fn from_minutes(minutes: i64) -> Self {
        Self {
            hold: Duration::minutes(minutes),
        }
    }

    /// Deadline in epoch milliseconds for a reservation created at `now`.
    pub fn expires_at_ms(&self, now: DateTime<Utc>) -> i64 {
        (now + self.hold).timestamp_millis()
    }

    /// A hold is stale once its deadline is strictly in the past.
    pub fn is_stale(expires_at_ms: i64, now: DateTime<Utc>) -> bool {
        expires_at_ms < now.timestamp_millis()
    }

    /// Checks that an expiry at `now` is allowed for the given reservation.
    pub fn check_expirable(
        state: ReservationState,
        expires_at_ms: i64,
        now: DateTime<Utc>,
    ) -> Result<ReservationState, TransitionError> {
        let next = state.expire()?;
        if !Self::is_stale(expires_at_ms, now) {
            return Err(TransitionError::HoldActive);
        }
        Ok(next)
    }
}
