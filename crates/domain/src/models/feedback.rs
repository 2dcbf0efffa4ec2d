//! Feedback domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A feedback message left on the site. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for submitting feedback.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeedbackRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 5000, message = "Message must be between 1 and 5000 characters"))]
    pub message: String,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub photo_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_validation() {
        let valid = CreateFeedbackRequest {
            name: "Eva".to_string(),
            email: "eva@example.com".to_string(),
            message: "Díky za akci".to_string(),
            photo_url: Some("https://img.example.com/1.jpg".to_string()),
        };
        assert!(valid.validate().is_ok());

        let bad_photo = CreateFeedbackRequest {
            photo_url: Some("file:///etc/passwd".to_string()),
            ..valid.clone()
        };
        assert!(bad_photo.validate().is_err());

        let no_photo = CreateFeedbackRequest {
            photo_url: None,
            ..valid
        };
        assert!(no_photo.validate().is_ok());
    }
}
