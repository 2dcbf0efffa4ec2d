//! Review routes. Public submissions wait for moderation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::review::{CreateReviewRequest, ListReviewsQuery};
use domain::models::{Review, ReviewStatus};
use persistence::repositories::ReviewRepository;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::AdminSession;

/// List approved reviews.
///
/// GET /api/reviews
pub async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Review>>, ApiError> {
    let repo = ReviewRepository::new(state.pool.clone());
    let reviews = repo.list(Some(ReviewStatus::Approved)).await?;
    Ok(Json(reviews.into_iter().map(Review::from).collect()))
}

/// Submit a review. It stays hidden until approved.
///
/// POST /api/reviews
pub async fn create_review(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let repo = ReviewRepository::new(state.pool.clone());
    let review = repo
        .create(
            &Uuid::new_v4().to_string(),
            request.name.trim(),
            request.rating,
            request.message.trim(),
        )
        .await?;

    info!(review_id = %review.id, rating = review.rating, "Review submitted");
    Ok((StatusCode::CREATED, Json(review.into())))
}

/// GET /api/admin/reviews?status=pending|approved
pub async fn admin_list_reviews(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(query): Query<ListReviewsQuery>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let repo = ReviewRepository::new(state.pool.clone());
    let reviews = repo.list(query.status).await?;
    Ok(Json(reviews.into_iter().map(Review::from).collect()))
}

/// POST /api/admin/reviews/:id/approve
pub async fn approve_review(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<Review>, ApiError> {
    let repo = ReviewRepository::new(state.pool.clone());
    let review = repo
        .approve(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Review not found".into()))?;

    info!(review_id = %review.id, session = %session.jti, "Review approved");
    Ok(Json(review.into()))
}

/// DELETE /api/admin/reviews/:id
pub async fn delete_review(
    State(state): State<AppState>,
    session: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let repo = ReviewRepository::new(state.pool.clone());
    if repo.delete(&id).await? == 0 {
        return Err(ApiError::NotFound("Review not found".into()));
    }

    info!(review_id = %id, session = %session.jti, "Review deleted");
    Ok(StatusCode::NO_CONTENT)
}
