//! Crew member domain model.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A member of the organising crew.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub photo_url: Option<String>,
    pub position: i32,
}

/// Request payload for adding a crew member.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCrewMemberRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 100, message = "Role too long"))]
    #[serde(default)]
    pub role: String,

    #[validate(length(max = 2000, message = "Bio too long"))]
    #[serde(default)]
    pub bio: String,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub photo_url: Option<String>,

    #[serde(default)]
    pub position: i32,
}

/// Request payload for updating a crew member.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCrewMemberRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Role too long"))]
    pub role: Option<String>,

    #[validate(length(max = 2000, message = "Bio too long"))]
    pub bio: Option<String>,

    #[validate(custom(function = "shared::validation::validate_http_url"))]
    pub photo_url: Option<String>,

    pub position: Option<i32>,
}

impl CrewMember {
    /// Applies the fields present in `update`.
    pub fn apply(&mut self, update: UpdateCrewMemberRequest) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        if update.photo_url.is_some() {
            self.photo_url = update.photo_url;
        }
        if let Some(position) = update.position {
            self.position = position;
        }
    }
}
