//! Content block entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::ContentBlock;

/// Database row mapping for the content_blocks table.
#[derive(Debug, Clone, FromRow)]
pub struct ContentBlockEntity {
    pub key: String,
    pub title: String,
    pub body: String,
    pub updated_at: DateTime<Utc>,
}

impl From<ContentBlockEntity> for ContentBlock {
    fn from(entity: ContentBlockEntity) -> Self {
        Self {
            key: entity.key,
            title: entity.title,
            body: entity.body,
            updated_at: entity.updated_at,
        }
    }
}
