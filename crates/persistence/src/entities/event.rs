//! Event entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::Event;

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub spots: i32,
    pub price: i32,
    pub photos: Vec<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            description: entity.description,
            date: entity.date,
            location: entity.location,
            capacity: entity.capacity,
            spots: entity.spots,
            price: entity.price,
            photos: entity.photos,
            archived: entity.archived,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_to_domain() {
        let now = Utc::now();
        let entity = EventEntity {
            id: "quiz-night".to_string(),
            title: "Quiz night".to_string(),
            description: "Hospodský kvíz".to_string(),
            date: now,
            location: "Praha".to_string(),
            capacity: 40,
            spots: 12,
            price: 150,
            photos: vec!["https://cdn.example.com/q.jpg".to_string()],
            archived: false,
            created_at: now,
            updated_at: now,
        };

        let event: Event = entity.into();
        assert_eq!(event.id, "quiz-night");
        assert_eq!(event.spots, 12);
        assert_eq!(event.photos.len(), 1);
    }
}
