//! Background job scheduler and job implementations.

mod archive_past_events;
mod expire_reservations;
mod notification_cleanup;
mod notification_dispatch;
mod pool_metrics;
mod scheduler;

pub use archive_past_events::ArchivePastEventsJob;
pub use expire_reservations::ExpireReservationsJob;
pub use notification_cleanup::NotificationCleanupJob;
pub use notification_dispatch::NotificationDispatchJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{Job, JobError, JobFrequency, JobScheduler};
