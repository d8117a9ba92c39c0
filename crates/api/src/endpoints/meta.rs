//! Meta endpoints.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::middleware::AppState;

/// Service metadata response.
#[derive(Serialize)]
pub struct MetaResponse {
    pub name: &'static str,
    pub version: &'static str,
}

/// Get service metadata.
async fn meta() -> Json<MetaResponse> {
    Json(MetaResponse {
        name: "shopdesk",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(meta))
}
