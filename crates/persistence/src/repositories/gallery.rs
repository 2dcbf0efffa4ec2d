//! Gallery repository.

use sqlx::PgPool;

use crate::entities::GalleryItemEntity;
use crate::metrics::QueryTimer;

/// Repository for gallery items.
#[derive(Clone)]
pub struct GalleryRepository {
    pool: PgPool,
}

impl GalleryRepository {
    /// Creates a new GalleryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List gallery items in display order.
    pub async fn list(&self) -> Result<Vec<GalleryItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_gallery_items");
        let result = sqlx::query_as::<_, GalleryItemEntity>(
            r#"
            SELECT id, title, image_url, event_id, position, created_at
            FROM gallery_items
            ORDER BY position ASC, created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Add a gallery item.
    pub async fn create(
        &self,
        id: &str,
        title: &str,
        image_url: &str,
        event_id: Option<&str>,
        position: i32,
    ) -> Result<GalleryItemEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_gallery_item");
        let result = sqlx::query_as::<_, GalleryItemEntity>(
            r#"
            INSERT INTO gallery_items (id, title, image_url, event_id, position)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, image_url, event_id, position, created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(image_url)
        .bind(event_id)
        .bind(position)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a gallery item. Returns the number of rows deleted (0 or 1).
    pub async fn delete(&self, id: &str) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_gallery_item");
        let result = sqlx::query("DELETE FROM gallery_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
