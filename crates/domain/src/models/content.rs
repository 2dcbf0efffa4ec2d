//! Site content blocks (editable text sections).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A named block of site text, addressed by a slug key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    pub key: String,
    pub title: String,
    pub body: String,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating or replacing a content block.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertContentRequest {
    #[validate(length(max = 200, message = "Title too long"))]
    #[serde(default)]
    pub title: String,

    #[validate(length(max = 20000, message = "Body too long"))]
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_validation() {
        let req = UpsertContentRequest {
            title: "O nás".to_string(),
            body: "Pořádáme večery deskových her.".to_string(),
        };
        assert!(req.validate().is_ok());

        let too_long = UpsertContentRequest {
            title: String::new(),
            body: "x".repeat(20001),
        };
        assert!(too_long.validate().is_err());
    }
}
