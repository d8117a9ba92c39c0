//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use shopdesk_common::AppError;
use shopdesk_db::entities::user;

/// Authenticated user extractor.
///
/// Reads the user attached by [`crate::middleware::auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}
