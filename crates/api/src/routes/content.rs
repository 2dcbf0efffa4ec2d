//! Editable text blocks shown on the public site.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::content::UpsertContentRequest;
use domain::models::ContentBlock;
use persistence::repositories::ContentRepository;
use shared::validation::validate_slug;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::AdminSession;

/// GET /api/content/:key
pub async fn get_content(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ContentBlock>, ApiError> {
    let repo = ContentRepository::new(state.pool.clone());
    let block = repo
        .find_by_key(&key)
        .await?
        .ok_or_else(|| ApiError::NotFound("Content not found".into()))?;
    Ok(Json(block.into()))
}

/// Create or replace a content block.
///
/// PUT /api/admin/content/:key
pub async fn upsert_content(
    State(state): State<AppState>,
    session: AdminSession,
    Path(key): Path<String>,
    ValidatedJson(request): ValidatedJson<UpsertContentRequest>,
) -> Result<Json<ContentBlock>, ApiError> {
    validate_slug(&key).map_err(|_| {
        ApiError::Validation("Content key must be lowercase letters, digits and dashes".into())
    })?;

    let repo = ContentRepository::new(state.pool.clone());
    let block = repo.upsert(&key, request.title.trim(), &request.body).await?;

    info!(key = %block.key, session = %session.jti, "Content updated");
    Ok(Json(block.into()))
}
