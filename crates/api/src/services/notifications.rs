//! Outbox dispatch: turns queued notifications into emails.
//!
//! Rows are claimed with a short lease, rendered from their JSON payload
//! and sent. A failed send is recorded on the row and retried with backoff
//! until the attempts run out.

use sqlx::PgPool;
use thiserror::Error;
use tracing::{error, info, warn};

use domain::models::notification::{FeedbackNotice, ReservationNotice};
use domain::models::{NotificationKind, OutboxNotification};
use persistence::entities::NotificationStatusDb;
use persistence::repositories::NotificationRepository;

use super::email::{EmailMessage, EmailService};
use super::email_templates;
use crate::middleware::metrics;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid {kind} payload: {source}")]
    InvalidPayload {
        kind: NotificationKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Renders the fixed template for an outbox row.
pub fn render(notification: &OutboxNotification) -> Result<EmailMessage, RenderError> {
    let invalid = |source| RenderError::InvalidPayload {
        kind: notification.kind,
        source,
    };

    match notification.kind {
        NotificationKind::ReservationCreated => {
            let notice: ReservationNotice =
                serde_json::from_value(notification.payload.clone()).map_err(invalid)?;
            Ok(email_templates::reservation_created(
                &notification.recipient,
                &notice,
            ))
        }
        NotificationKind::ReservationExpired => {
            let notice: ReservationNotice =
                serde_json::from_value(notification.payload.clone()).map_err(invalid)?;
            Ok(email_templates::reservation_expired(
                &notification.recipient,
                &notice,
            ))
        }
        NotificationKind::FeedbackReceived => {
            let notice: FeedbackNotice =
                serde_json::from_value(notification.payload.clone()).map_err(invalid)?;
            Ok(email_templates::feedback_received(
                &notification.recipient,
                &notice,
            ))
        }
    }
}

/// Result of one dispatch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub claimed: usize,
    pub sent: usize,
    pub retried: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    repo: NotificationRepository,
    email: EmailService,
    batch_size: i64,
    lease_secs: i64,
}

impl NotificationDispatcher {
    pub fn new(pool: PgPool, email: EmailService, batch_size: i64, lease_secs: i64) -> Self {
        Self {
            repo: NotificationRepository::new(pool),
            email,
            batch_size,
            lease_secs,
        }
    }

    /// Claims due notifications and tries to deliver each one once.
    pub async fn dispatch_due(&self) -> Result<DispatchReport, sqlx::Error> {
        let claimed = self.repo.claim_due(self.batch_size, self.lease_secs).await?;
        let mut report = DispatchReport {
            claimed: claimed.len(),
            ..DispatchReport::default()
        };

        for entity in claimed {
            let notification = OutboxNotification::from(entity);
            let kind = notification.kind.as_str();

            let delivery = match render(&notification) {
                Ok(message) => self
                    .email
                    .send(message)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };

            match delivery {
                Ok(()) => {
                    self.repo.mark_sent(notification.id).await?;
                    metrics::record_notification(kind, "sent");
                    report.sent += 1;
                    info!(
                        notification_id = notification.id,
                        kind = %notification.kind,
                        dedup_key = %notification.dedup_key,
                        "Notification sent"
                    );
                }
                Err(reason) => {
                    let updated = self
                        .repo
                        .mark_failed(notification.id, notification.attempts, &reason)
                        .await?;
                    if updated.status == NotificationStatusDb::Failed {
                        metrics::record_notification(kind, "failed");
                        report.failed += 1;
                        error!(
                            notification_id = notification.id,
                            kind = %notification.kind,
                            attempts = updated.attempts,
                            error = %reason,
                            "Notification failed permanently"
                        );
                    } else {
                        metrics::record_notification(kind, "retry");
                        report.retried += 1;
                        warn!(
                            notification_id = notification.id,
                            kind = %notification.kind,
                            attempts = updated.attempts,
                            next_attempt_at = %updated.next_attempt_at,
                            error = %reason,
                            "Notification delivery failed, will retry"
                        );
                    }
                }
            }
        }

        Ok(report)
    }
}
