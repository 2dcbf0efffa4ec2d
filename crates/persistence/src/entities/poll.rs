//! Poll entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::{Poll, PollOption};

/// Database row mapping for the polls table.
#[derive(Debug, Clone, FromRow)]
pub struct PollEntity {
    pub id: String,
    pub question: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Database row mapping for the poll_options table.
#[derive(Debug, Clone, FromRow)]
pub struct PollOptionEntity {
    pub id: String,
    pub poll_id: String,
    pub label: String,
    pub votes: i64,
    pub position: i32,
}

impl From<PollOptionEntity> for PollOption {
    fn from(entity: PollOptionEntity) -> Self {
        Self {
            id: entity.id,
            label: entity.label,
            votes: entity.votes,
            position: entity.position,
        }
    }
}

impl PollEntity {
    /// Builds the domain poll from its row and the option rows that belong to it.
    pub fn into_poll(self, options: &[PollOptionEntity]) -> Poll {
        let mut options: Vec<PollOption> = options
            .iter()
            .filter(|o| o.poll_id == self.id)
            .cloned()
            .map(PollOption::from)
            .collect();
        options.sort_by_key(|o| o.position);

        Poll {
            id: self.id,
            question: self.question,
            active: self.active,
            options,
            created_at: self.created_at,
        }
    }
}
