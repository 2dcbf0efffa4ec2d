//! Notification outbox repository.
//!
//! Notifications are written in the same transaction as the change that
//! triggers them and delivered later by the dispatch job.

use chrono::{Duration, Utc};
use sqlx::{PgExecutor, PgPool};

use domain::models::notification::NewNotification;

use crate::entities::notification::{
    retry_delay_secs, NotificationEntity, NotificationKindDb, NotificationStatusDb,
};
use crate::metrics::QueryTimer;

const NOTIFICATION_COLUMNS: &str = "id, kind, recipient, payload, dedup_key, status, attempts, \
                                    next_attempt_at, sent_at, last_error, created_at";

/// Repository for the notification outbox.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Creates a new NotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Enqueue a notification using any executor, typically an open transaction.
    ///
    /// Returns false if a notification with the same dedup key already exists.
    pub async fn enqueue_with<'e, E>(
        executor: E,
        notification: &NewNotification,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO notification_outbox (kind, recipient, payload, dedup_key)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (dedup_key) DO NOTHING
            "#,
        )
        .bind(NotificationKindDb::from(notification.kind))
        .bind(&notification.recipient)
        .bind(&notification.payload)
        .bind(&notification.dedup_key)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Claim up to `limit` due notifications.
    ///
    /// Claimed rows are leased by pushing `next_attempt_at` forward by
    /// `lease_secs`, so a concurrent dispatcher skips them. Rows locked by
    /// another claim are skipped rather than waited on.
    pub async fn claim_due(
        &self,
        limit: i64,
        lease_secs: i64,
    ) -> Result<Vec<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("claim_due_notifications");
        let query = format!(
            r#"
            UPDATE notification_outbox
            SET next_attempt_at = NOW() + make_interval(secs => $2)
            WHERE id IN (
                SELECT id FROM notification_outbox
                WHERE status = 'pending' AND next_attempt_at <= NOW()
                ORDER BY next_attempt_at
                LIMIT $1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        );
        let result = sqlx::query_as::<_, NotificationEntity>(&query)
            .bind(limit)
            .bind(lease_secs as f64)
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Mark a notification as delivered.
    pub async fn mark_sent(&self, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("mark_notification_sent");
        let result = sqlx::query(
            r#"
            UPDATE notification_outbox
            SET status = 'sent', attempts = attempts + 1, sent_at = NOW(), last_error = NULL
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Record a failed delivery attempt and schedule the next one.
    ///
    /// `attempts_before` is the attempt count of the claimed row. Once the
    /// attempts are used up the notification is marked failed.
    pub async fn mark_failed(
        &self,
        id: i64,
        attempts_before: i32,
        error: &str,
    ) -> Result<NotificationEntity, sqlx::Error> {
        let timer = QueryTimer::new("mark_notification_failed");
        let attempts = attempts_before + 1;
        let (status, next_attempt_at) = match retry_delay_secs(attempts) {
            Some(delay) => (
                NotificationStatusDb::Pending,
                Utc::now() + Duration::seconds(delay),
            ),
            None => (NotificationStatusDb::Failed, Utc::now()),
        };

        let query = format!(
            r#"
            UPDATE notification_outbox
            SET status = $2,
                attempts = $3,
                next_attempt_at = $4,
                last_error = $5
            WHERE id = $1
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        );
        let result = sqlx::query_as::<_, NotificationEntity>(&query)
            .bind(id)
            .bind(status)
            .bind(attempts)
            .bind(next_attempt_at)
            .bind(error)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Count notifications still waiting for delivery.
    pub async fn count_pending(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_pending_notifications");
        let result: Result<(i64,), sqlx::Error> = sqlx::query_as(
            r#"SELECT COUNT(*) FROM notification_outbox WHERE status = 'pending'"#,
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.0)
    }

    /// Find a notification by its dedup key.
    pub async fn find_by_dedup_key(
        &self,
        dedup_key: &str,
    ) -> Result<Option<NotificationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_notification_by_dedup_key");
        let query = format!(
            "SELECT {} FROM notification_outbox WHERE dedup_key = $1",
            NOTIFICATION_COLUMNS
        );
        let result = sqlx::query_as::<_, NotificationEntity>(&query)
            .bind(dedup_key)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Delete delivered notifications older than `retention_days`.
    pub async fn delete_sent_older_than(&self, retention_days: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_old_notifications");
        let cutoff = Utc::now() - Duration::days(retention_days);
        let result = sqlx::query(
            r#"
            DELETE FROM notification_outbox
            WHERE status = 'sent' AND sent_at < $1
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
