//! Background job that expires unpaid reservation holds.

use super::scheduler::{Job, JobError, JobFrequency};
use crate::services::ReservationService;

/// Releases the seats of holds whose payment deadline has passed.
///
/// Runs once at startup so holds that ran out while the service was down
/// are released straight away.
pub struct ExpireReservationsJob {
    reservations: ReservationService,
    interval_secs: u64,
}

impl ExpireReservationsJob {
    pub fn new(reservations: ReservationService, interval_secs: u64) -> Self {
        Self {
            reservations,
            interval_secs,
        }
    }
}

#[async_trait::async_trait]
impl Job for ExpireReservationsJob {
    fn name(&self) -> &'static str {
        "expire_reservations"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.interval_secs)
    }

    fn run_on_start(&self) -> bool {
        true
    }

    async fn execute(&self) -> Result<(), JobError> {
        let report = self.reservations.expire_stale().await?;
        if report.expired > 0 || report.skipped > 0 {
            tracing::info!(
                expired = report.expired,
                seats_released = report.seats_released,
                skipped = report.skipped,
                policy = %self.reservations.restore_policy(),
                "Expiry sweep finished"
            );
        }
        Ok(())
    }
}
