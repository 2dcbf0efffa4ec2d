//! Content block repository.

use sqlx::PgPool;

use crate::entities::ContentBlockEntity;
use crate::metrics::QueryTimer;

/// Repository for editable site text.
#[derive(Clone)]
pub struct ContentRepository {
    pool: PgPool,
}

impl ContentRepository {
    /// Creates a new ContentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a content block by key.
    pub async fn find_by_key(&self, key: &str) -> Result<Option<ContentBlockEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_content_block");
        let result = sqlx::query_as::<_, ContentBlockEntity>(
            "SELECT key, title, body, updated_at FROM content_blocks WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create or replace a content block.
    pub async fn upsert(
        &self,
        key: &str,
        title: &str,
        body: &str,
    ) -> Result<ContentBlockEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_content_block");
        let result = sqlx::query_as::<_, ContentBlockEntity>(
            r#"
            INSERT INTO content_blocks (key, title, body)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE
            SET title = EXCLUDED.title, body = EXCLUDED.body, updated_at = NOW()
            RETURNING key, title, body, updated_at
            "#,
        )
        .bind(key)
        .bind(title)
        .bind(body)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
