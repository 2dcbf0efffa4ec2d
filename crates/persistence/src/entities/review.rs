//! Review entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{Review, ReviewStatus};

/// Database enum for review_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "review_status", rename_all = "lowercase")]
pub enum ReviewStatusDb {
    Pending,
    Approved,
}

impl From<ReviewStatusDb> for ReviewStatus {
    fn from(db: ReviewStatusDb) -> Self {
        match db {
            ReviewStatusDb::Pending => ReviewStatus::Pending,
            ReviewStatusDb::Approved => ReviewStatus::Approved,
        }
    }
}

impl From<ReviewStatus> for ReviewStatusDb {
    fn from(status: ReviewStatus) -> Self {
        match status {
            ReviewStatus::Pending => ReviewStatusDb::Pending,
            ReviewStatus::Approved => ReviewStatusDb::Approved,
        }
    }
}

/// Database row mapping for the reviews table.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewEntity {
    pub id: String,
    pub name: String,
    pub rating: i32,
    pub message: String,
    pub status: ReviewStatusDb,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewEntity> for Review {
    fn from(entity: ReviewEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            rating: entity.rating,
            message: entity.message,
            status: entity.status.into(),
            created_at: entity.created_at,
        }
    }
}
