//! Admin session extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::middleware::admin_auth::AdminSession;

#[async_trait]
impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    /// Reads the session stored by [`require_admin`](crate::middleware::require_admin).
    /// A handler mounted outside that middleware is rejected with 401.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminSession>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Admin session required".into()))
    }
}
