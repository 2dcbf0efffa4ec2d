//! Gallery domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A photo shown in the public gallery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub event_id: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// Request payload for adding a gallery item.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGalleryItemRequest {
    #[validate(length(max = 200, message = "Title too long"))]
    #[serde(default)]
    pub title: String,

    #[validate(length(min = 1, max = 2000, message = "Image URL is required"))]
    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub image_url: String,

    pub event_id: Option<String>,

    #[serde(default)]
    pub position: i32,
}
