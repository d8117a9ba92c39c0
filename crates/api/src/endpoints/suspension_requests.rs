//! Suspension request endpoints (manager gate).

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use serde::Deserialize;
use shopdesk_common::AppResult;
use shopdesk_core::{
    ManagerViewCounts, ManagerViewLabel, ReviewInput, SuspensionRequestView, require_manager,
};

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{ApiResponse, MessageResponse},
};

/// List query.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// `pending`, `approved` or `rejected`; anything else lists all.
    #[serde(default)]
    pub status: Option<String>,
}

/// Review request body.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// List requests for the manager view.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<SuspensionRequestView>>> {
    require_manager(&user)?;

    let filter = query.status.as_deref().and_then(ManagerViewLabel::parse);
    let views = state
        .suspension_request_service
        .list_for_manager(filter)
        .await?;

    Ok(ApiResponse::ok(views))
}

/// Count requests per view label.
async fn counts(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<ManagerViewCounts>> {
    require_manager(&user)?;

    Ok(Json(state.suspension_request_service.counts().await?))
}

/// Get a single request.
async fn show(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SuspensionRequestView>> {
    require_manager(&user)?;

    Ok(Json(state.suspension_request_service.get_one(&id).await?))
}

/// Approve or reject a pending request.
async fn review(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> AppResult<MessageResponse> {
    require_manager(&user)?;

    let input = ReviewInput::parse(req.action.as_deref(), req.note)?;
    let outcome = state
        .suspension_request_service
        .review(&user.id, &id, input)
        .await?;

    Ok(MessageResponse::new(outcome.message))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/counts", get(counts))
        .route("/{id}", get(show))
        .route("/{id}/review", post(review))
}
