//! Background job that prunes delivered notifications from the outbox.

use persistence::repositories::NotificationRepository;

use super::scheduler::{Job, JobError, JobFrequency};

/// Deletes sent notifications older than the retention period.
///
/// Failed rows are kept for inspection.
pub struct NotificationCleanupJob {
    repo: NotificationRepository,
    retention_days: i64,
}

impl NotificationCleanupJob {
    pub fn new(repo: NotificationRepository, retention_days: i64) -> Self {
        Self {
            repo,
            retention_days,
        }
    }
}

#[async_trait::async_trait]
impl Job for NotificationCleanupJob {
    fn name(&self) -> &'static str {
        "notification_cleanup"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Daily
    }

    async fn execute(&self) -> Result<(), JobError> {
        let deleted = self.repo.delete_sent_older_than(self.retention_days).await?;
        if deleted > 0 {
            tracing::info!(
                deleted,
                retention_days = self.retention_days,
                "Pruned delivered notifications"
            );
        }
        Ok(())
    }
}
