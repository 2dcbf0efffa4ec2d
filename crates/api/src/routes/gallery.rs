//! Gallery routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::gallery::CreateGalleryItemRequest;
use domain::models::GalleryItem;
use persistence::repositories::GalleryRepository;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::AdminSession;

/// GET /api/gallery
pub async fn list_gallery(
    State(state): State<AppState>,
) -> Result<Json<Vec<GalleryItem>>, ApiError> {
    let repo = GalleryRepository::new(state.pool.clone());
    let items = repo.list().await?;
    Ok(Json(items.into_iter().map(GalleryItem::from).collect()))
}

/// POST /api/admin/gallery
pub async fn create_gallery_item(
    State(state): State<AppState>,
    session: AdminSession,
    ValidatedJson(request): ValidatedJson<CreateGalleryItemRequest>,
) -> Result<(StatusCode, Json<GalleryItem>), ApiError> {
    let repo = GalleryRepository::new(state.pool.clone());
    let item = repo
        .create(
            &Uuid::new_v4().to_string(),
            request.title.trim(),
            request.image_url.trim(),
            request.event_id.as_deref(),
            request.position,
        )
        .await?;

    info!(item_id = %item.id, session = %session.jti, "Gallery item added");
    Ok((StatusCode::CREATED, Json(item.into())))
}

/// DELETE /api/admin/gallery/:id
pub async fn delete_gallery_item(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let repo = GalleryRepository::new(state.pool.clone());
    if repo.delete(&id).await? == 0 {
        return Err(ApiError::NotFound("Gallery item not found".into()));
    }

    info!(item_id = %id, session = %session.jti, "Gallery item deleted");
    Ok(StatusCode::NO_CONTENT)
}
