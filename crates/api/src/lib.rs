//! HTTP API layer for shopdesk.
//!
//! - **Endpoints**: suspension request review and manager views
//! - **Extractors**: authenticated user
//! - **Middleware**: bearer token authentication
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
