//! Admin session middleware.
//!
//! Every `/api/admin/*` route except login sits behind [`require_admin`].

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated admin session, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct AdminSession {
    /// Token ID (jti), logged with admin writes.
    pub jti: String,
    /// Token expiry in unix seconds.
    pub expires_at: i64,
}

/// Returns the token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Middleware that requires a valid admin session token.
///
/// Responds 503 when the admin API is not configured and 401 when the token
/// is missing, malformed, expired or not an admin token.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(jwt) = state.jwt.as_ref() else {
        return ApiError::ServiceUnavailable("Admin API is not configured".into()).into_response();
    };

    let Some(token) = bearer_token(req.headers()) else {
        return ApiError::Unauthorized("Missing or invalid Authorization header".into())
            .into_response();
    };

    match jwt.validate_admin(token) {
        Ok(claims) => {
            req.extensions_mut().insert(AdminSession {
                jti: claims.jti,
                expires_at: claims.exp,
            });
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Admin token rejected");
            ApiError::Unauthorized("Invalid or expired token".into()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")), Some("abc.def"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
