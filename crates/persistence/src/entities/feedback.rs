//! Feedback entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::Feedback;

/// Database row mapping for the feedback table.
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackEntity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackEntity> for Feedback {
    fn from(entity: FeedbackEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            message: entity.message,
            photo_url: entity.photo_url,
            created_at: entity.created_at,
        }
    }
}
