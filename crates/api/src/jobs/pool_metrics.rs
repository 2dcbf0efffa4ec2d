//! Background job to record connection pool and outbox gauges.

use persistence::repositories::NotificationRepository;
use sqlx::PgPool;

use super::scheduler::{Job, JobError, JobFrequency};

/// Job that periodically records database pool metrics and the number of
/// notifications still waiting in the outbox.
pub struct PoolMetricsJob {
    pool: PgPool,
    notifications: NotificationRepository,
}

impl PoolMetricsJob {
    /// Create a new pool metrics job.
    pub fn new(pool: PgPool) -> Self {
        Self {
            notifications: NotificationRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait::async_trait]
impl Job for PoolMetricsJob {
    fn name(&self) -> &'static str {
        "pool_metrics"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(1)
    }

    async fn execute(&self) -> Result<(), JobError> {
        persistence::metrics::record_pool_metrics(&self.pool);
        let pending = self.notifications.count_pending().await?;
        persistence::metrics::record_outbox_backlog(pending);
        Ok(())
    }
}
