//! Admin login.

use axum::{extract::State, Json};
use domain::models::admin::{LoginRequest, LoginResponse};
use shared::jwt::ADMIN_SUBJECT;
use shared::password::verify_password;
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::ValidatedJson;

/// Exchange the admin password for a session token.
///
/// POST /api/admin/login
///
/// Responds 503 when no password hash or signing secret is configured.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(jwt) = state.jwt.as_ref() else {
        return Err(ApiError::ServiceUnavailable(
            "Admin API is not configured".into(),
        ));
    };

    // Argon2 verification blocks; run it on the blocking pool.
    let hash = state.config.admin.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&request.password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Password check task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("Password check failed: {}", e)))?;

    if !verified {
        warn!("Admin login failed");
        return Err(ApiError::Unauthorized("Invalid password".into()));
    }

    let (token, expires_at) = jwt
        .issue(ADMIN_SUBJECT)
        .map_err(|e| ApiError::Internal(format!("Token issue failed: {}", e)))?;

    info!(expires_at, "Admin logged in");
    Ok(Json(LoginResponse::bearer(token, expires_at)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{body_json, json_request, send, test_router};
    use crate::services::payments::mock::MockGateway;

    #[tokio::test]
    async fn test_login_unavailable_without_hash() {
        let app = test_router(&[], Arc::new(MockGateway::default()));
        let response = send(
            app,
            json_request("POST", "/api/admin/login", json!({ "password": "x" })),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_login_issues_token_usable_on_admin_routes() {
        let hash = shared::password::hash_password("correct horse").unwrap();
        let overrides = [("admin.password_hash", hash.as_str())];

        let wrong = send(
            test_router(&overrides, Arc::new(MockGateway::default())),
            json_request("POST", "/api/admin/login", json!({ "password": "wrong" })),
        )
        .await;
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

        let response = send(
            test_router(&overrides, Arc::new(MockGateway::default())),
            json_request("POST", "/api/admin/login", json!({ "password": "correct horse" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["tokenType"], "Bearer");
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(body["expiresAt"].as_i64().is_some());
    }
}
