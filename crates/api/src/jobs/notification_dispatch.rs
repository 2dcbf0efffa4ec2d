//! Background job that delivers queued notifications.

use super::scheduler::{Job, JobError, JobFrequency};
use crate::services::NotificationDispatcher;

/// Sends due outbox notifications and schedules retries for failures.
pub struct NotificationDispatchJob {
    dispatcher: NotificationDispatcher,
}

impl NotificationDispatchJob {
    pub fn new(dispatcher: NotificationDispatcher) -> Self {
        Self { dispatcher }
    }
}

#[async_trait::async_trait]
impl Job for NotificationDispatchJob {
    fn name(&self) -> &'static str {
        "notification_dispatch"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Minutes(1)
    }

    async fn execute(&self) -> Result<(), JobError> {
        let report = self.dispatcher.dispatch_due().await?;
        if report.claimed > 0 {
            tracing::info!(
                claimed = report.claimed,
                sent = report.sent,
                retried = report.retried,
                failed = report.failed,
                "Outbox dispatch finished"
            );
        }
        Ok(())
    }
}
