//! Maintenance entry points for external schedulers.

use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use shared::crypto::sha256_hex;
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::bearer_token;

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub cleaned: usize,
}

/// Checks the cron bearer token. An empty secret leaves the endpoint open.
fn authorize_cron(secret: &str, headers: &HeaderMap) -> Result<(), ApiError> {
    if secret.is_empty() {
        return Ok(());
    }
    // Compare digests, not the raw secret.
    match bearer_token(headers) {
        Some(token) if sha256_hex(token) == sha256_hex(secret) => Ok(()),
        _ => Err(ApiError::Unauthorized("Invalid cron secret".into())),
    }
}

/// Expire stale reservation holds now.
///
/// GET|POST /api/cleanup-expired
///
/// Runs the same sweep as the `expire_reservations` job; both are safe to
/// run concurrently.
pub async fn cleanup_expired(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CleanupResponse>, ApiError> {
    authorize_cron(&state.config.cron.secret, &headers)?;

    let report = state.reservations.expire_stale().await?;
    info!(
        expired = report.expired,
        seats_released = report.seats_released,
        skipped = report.skipped,
        "Cleanup endpoint finished"
    );

    Ok(Json(CleanupResponse {
        cleaned: report.expired,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};

    fn bearer(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_open_without_secret() {
        assert!(authorize_cron("", &HeaderMap::new()).is_ok());
    }

    #[test]
    fn test_secret_required_when_configured() {
        assert!(authorize_cron("s3cret", &HeaderMap::new()).is_err());
        assert!(authorize_cron("s3cret", &bearer("Bearer wrong")).is_err());
        assert!(authorize_cron("s3cret", &bearer("Bearer s3cret")).is_ok());
    }

    #[tokio::test]
    async fn test_endpoint_rejects_wrong_secret() {
        use std::sync::Arc;

        use axum::body::Body;
        use axum::http::{Request, StatusCode};

        use crate::routes::test_support::{send, test_router};
        use crate::services::payments::mock::MockGateway;

        let app = test_router(&[("cron.secret", "s3cret")], Arc::new(MockGateway::default()));
        let request = Request::builder()
            .method("POST")
            .uri("/api/cleanup-expired")
            .header("authorization", "Bearer nope")
            .body(Body::empty())
            .unwrap();

        let response = send(app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
