//! Admin session payloads.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for `POST /api/admin/login`.
#[derive(Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 256, message = "Password is required"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Issued admin session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    /// Expiry in unix seconds.
    pub expires_at: i64,
}

impl LoginResponse {
    pub fn bearer(token: String, expires_at: i64) -> Self {
        Self {
            token,
            token_type: "Bearer",
            expires_at,
        }
    }
}
