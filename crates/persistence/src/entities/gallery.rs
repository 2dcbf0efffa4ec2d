//! Gallery item entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::GalleryItem;

/// Database row mapping for the gallery_items table.
#[derive(Debug, Clone, FromRow)]
pub struct GalleryItemEntity {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub event_id: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl From<GalleryItemEntity> for GalleryItem {
    fn from(entity: GalleryItemEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            image_url: entity.image_url,
            event_id: entity.event_id,
            position: entity.position,
            created_at: entity.created_at,
        }
    }
}
