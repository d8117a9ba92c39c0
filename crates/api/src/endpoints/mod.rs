//! API endpoints.

mod meta;
mod suspension_requests;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/meta", meta::router())
        .nest("/suspension-requests", suspension_requests::router())
}
