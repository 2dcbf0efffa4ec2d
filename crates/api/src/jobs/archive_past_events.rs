//! Background job that archives events once their date has passed.

use chrono::Utc;
use persistence::repositories::EventRepository;

use super::scheduler::{Job, JobError, JobFrequency};

/// Reconciles the stored `archived` flag with the event date.
///
/// Reads never depend on this job: responses derive `archived` from the
/// date. It keeps the stored flag honest for admin listings and exports.
pub struct ArchivePastEventsJob {
    events: EventRepository,
}

impl ArchivePastEventsJob {
    pub fn new(events: EventRepository) -> Self {
        Self { events }
    }
}

#[async_trait::async_trait]
impl Job for ArchivePastEventsJob {
    fn name(&self) -> &'static str {
        "archive_past_events"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), JobError> {
        let archived = self.events.archive_past(Utc::now()).await?;
        if archived > 0 {
            tracing::info!(archived, "Archived past events");
        }
        Ok(())
    }
}
