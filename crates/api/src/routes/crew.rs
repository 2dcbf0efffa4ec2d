//! Crew (team members) routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::crew::{CreateCrewMemberRequest, UpdateCrewMemberRequest};
use domain::models::CrewMember;
use persistence::entities::CrewMemberEntity;
use persistence::repositories::CrewRepository;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::AdminSession;

fn to_entity(member: CrewMember) -> CrewMemberEntity {
    CrewMemberEntity {
        id: member.id,
        name: member.name,
        role: member.role,
        bio: member.bio,
        photo_url: member.photo_url,
        position: member.position,
    }
}

/// GET /api/crew
pub async fn list_crew(State(state): State<AppState>) -> Result<Json<Vec<CrewMember>>, ApiError> {
    let repo = CrewRepository::new(state.pool.clone());
    let members = repo.list().await?;
    Ok(Json(members.into_iter().map(CrewMember::from).collect()))
}

/// POST /api/admin/crew
pub async fn create_crew_member(
    State(state): State<AppState>,
    session: AdminSession,
    ValidatedJson(request): ValidatedJson<CreateCrewMemberRequest>,
) -> Result<(StatusCode, Json<CrewMember>), ApiError> {
    let member = CrewMember {
        id: Uuid::new_v4().to_string(),
        name: request.name.trim().to_string(),
        role: request.role,
        bio: request.bio,
        photo_url: request.photo_url,
        position: request.position,
    };

    let repo = CrewRepository::new(state.pool.clone());
    let saved = repo.save(&to_entity(member)).await?;

    info!(member_id = %saved.id, session = %session.jti, "Crew member added");
    Ok((StatusCode::CREATED, Json(saved.into())))
}

/// Update a crew member. Missing fields are left unchanged.
///
/// PATCH /api/admin/crew/:id
pub async fn update_crew_member(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCrewMemberRequest>,
) -> Result<Json<CrewMember>, ApiError> {
    let repo = CrewRepository::new(state.pool.clone());
    let mut member: CrewMember = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Crew member not found".into()))?
        .into();

    member.apply(request);
    let saved = repo.save(&to_entity(member)).await?;

    info!(member_id = %saved.id, session = %session.jti, "Crew member updated");
    Ok(Json(saved.into()))
}

/// DELETE /api/admin/crew/:id
pub async fn delete_crew_member(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let repo = CrewRepository::new(state.pool.clone());
    if repo.delete(&id).await? == 0 {
        return Err(ApiError::NotFound("Crew member not found".into()));
    }

    info!(member_id = %id, session = %session.jti, "Crew member deleted");
    Ok(StatusCode::NO_CONTENT)
}
