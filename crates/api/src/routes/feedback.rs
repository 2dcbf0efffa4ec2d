//! Feedback routes.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::feedback::CreateFeedbackRequest;
use domain::models::Feedback;
use persistence::repositories::FeedbackRepository;
use tracing::info;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::middleware::AdminSession;

/// Store feedback and queue an email to the organiser.
///
/// POST /api/feedback
pub async fn create_feedback(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateFeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>), ApiError> {
    let repo = FeedbackRepository::new(state.pool.clone());
    let feedback = repo
        .create_and_notify(
            &Uuid::new_v4().to_string(),
            request.name.trim(),
            request.email.trim(),
            request.message.trim(),
            request.photo_url.as_deref(),
            state.email.organizer_email(),
        )
        .await?;

    info!(feedback_id = %feedback.id, "Feedback received");
    Ok((StatusCode::CREATED, Json(feedback.into())))
}

/// GET /api/admin/feedback
pub async fn admin_list_feedback(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<Feedback>>, ApiError> {
    let repo = FeedbackRepository::new(state.pool.clone());
    let feedback = repo.list().await?;
    Ok(Json(feedback.into_iter().map(Feedback::from).collect()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{json_request, send, test_router};
    use crate::services::payments::mock::MockGateway;

    #[tokio::test]
    async fn test_photo_url_must_be_http() {
        let app = test_router(&[], Arc::new(MockGateway::default()));
        let request = json_request(
            "POST",
            "/api/feedback",
            json!({
                "name": "Eva",
                "email": "eva@example.com",
                "message": "Díky za akci",
                "photoUrl": "javascript:alert(1)"
            }),
        );

        let response = send(app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
