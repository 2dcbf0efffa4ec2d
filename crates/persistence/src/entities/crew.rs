//! Crew member entity (database row mapping).

use sqlx::FromRow;

use domain::models::CrewMember;

/// Database row mapping for the crew_members table.
#[derive(Debug, Clone, FromRow)]
pub struct CrewMemberEntity {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub photo_url: Option<String>,
    pub position: i32,
}

impl From<CrewMemberEntity> for CrewMember {
    fn from(entity: CrewMemberEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            role: entity.role,
            bio: entity.bio,
            photo_url: entity.photo_url,
            position: entity.position,
        }
    }
}
