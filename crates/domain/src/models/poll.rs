//! Poll domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Maximum number of options a poll may have.
pub const MAX_POLL_OPTIONS: usize = 10;

/// A poll with its options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub active: bool,
    pub options: Vec<PollOption>,
    pub created_at: DateTime<Utc>,
}

impl Poll {
    pub fn total_votes(&self) -> i64 {
        self.options.iter().map(|o| o.votes).sum()
    }

    pub fn option(&self, option_id: &str) -> Option<&PollOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// One answer of a poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    pub id: String,
    pub label: String,
    pub votes: i64,
    pub position: i32,
}

/// Request payload for creating a poll.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    #[validate(length(min = 1, max = 300, message = "Question must be between 1 and 300 characters"))]
    pub question: String,

    #[validate(length(min = 2, max = 10, message = "A poll needs between 2 and 10 options"))]
    #[validate(custom(function = "validate_option_labels"))]
    pub options: Vec<String>,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

fn validate_option_labels(labels: &[String]) -> Result<(), validator::ValidationError> {
    if labels
        .iter()
        .all(|l| !l.trim().is_empty() && l.chars().count() <= 200)
    {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("invalid_option_label");
        err.message = Some("Option labels must be 1-200 characters".into());
        Err(err)
    }
}

/// Request payload for toggling whether a poll accepts votes.
#[derive(Debug, Clone, Deserialize)]
pub struct SetPollActiveRequest {
    pub active: bool,
}

/// Request payload for casting a vote.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[validate(length(min = 1, max = 100, message = "Option ID is required"))]
    pub option_id: String,

    /// Browser token identifying the voter. Stored only as a hash.
    #[validate(length(min = 8, max = 200, message = "Voter ID must be between 8 and 200 characters"))]
    pub voter_id: String,
}
