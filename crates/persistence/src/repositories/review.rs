//! Review repository.

use sqlx::PgPool;

use domain::models::ReviewStatus;

use crate::entities::{ReviewEntity, ReviewStatusDb};
use crate::metrics::QueryTimer;

/// Repository for review operations.
#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    /// Creates a new ReviewRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a review waiting for moderation.
    pub async fn create(
        &self,
        id: &str,
        name: &str,
        rating: i32,
        message: &str,
    ) -> Result<ReviewEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_review");
        let result = sqlx::query_as::<_, ReviewEntity>(
            r#"
            INSERT INTO reviews (id, name, rating, message, status)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING id, name, rating, message, status, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(rating)
        .bind(message)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List reviews, newest first. `None` lists every status.
    pub async fn list(
        &self,
        status: Option<ReviewStatus>,
    ) -> Result<Vec<ReviewEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_reviews");
        let result = sqlx::query_as::<_, ReviewEntity>(
            r#"
            SELECT id, name, rating, message, status, created_at
            FROM reviews
            WHERE ($1::review_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status.map(ReviewStatusDb::from))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Publish a pending review.
    pub async fn approve(&self, id: &str) -> Result<Option<ReviewEntity>, sqlx::Error> {
        let timer = QueryTimer::new("approve_review");
        let result = sqlx::query_as::<_, ReviewEntity>(
            r#"
            UPDATE reviews SET status = 'approved'
            WHERE id = $1
            RETURNING id, name, rating, message, status, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a review. Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, id: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_review");
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
