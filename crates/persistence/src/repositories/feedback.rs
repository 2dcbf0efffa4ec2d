//! Feedback repository.

use sqlx::PgPool;

use domain::models::notification::{FeedbackNotice, NewNotification};

use crate::entities::FeedbackEntity;
use crate::metrics::QueryTimer;
use crate::repositories::notification::NotificationRepository;

/// Repository for feedback operations.
#[derive(Clone)]
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    /// Creates a new FeedbackRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store feedback and queue the organiser notification in one transaction.
    pub async fn create_and_notify(
        &self,
        id: &str,
        name: &str,
        email: &str,
        message: &str,
        photo_url: Option<&str>,
        organizer_email: &str,
    ) -> Result<FeedbackEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_feedback");
        let mut tx = self.pool.begin().await?;

        let feedback = sqlx::query_as::<_, FeedbackEntity>(
            r#"
            INSERT INTO feedback (id, name, email, message, photo_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, message, photo_url, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(message)
        .bind(photo_url)
        .fetch_one(&mut *tx)
        .await?;

        let notice = FeedbackNotice {
            feedback_id: feedback.id.clone(),
            name: feedback.name.clone(),
            email: feedback.email.clone(),
            message: feedback.message.clone(),
            photo_url: feedback.photo_url.clone(),
        };
        NotificationRepository::enqueue_with(
            &mut *tx,
            &NewNotification::feedback_received(organizer_email, &notice),
        )
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(feedback)
    }

    /// List feedback, newest first.
    pub async fn list(&self) -> Result<Vec<FeedbackEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_feedback");
        let result = sqlx::query_as::<_, FeedbackEntity>(
            r#"
            SELECT id, name, email, message, photo_url, created_at
            FROM feedback
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
