//! Suspension request workflow: manager review and the manager-facing views.
//!
//! A request moves through two human gates. This service implements the
//! manager gate:
//!
//! ```text
//! pending_manager --approve--> pending_owner --(owner)--> approved | rejected_owner
//!                 --reject---> rejected_manager
//! ```

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::Serialize;
use shopdesk_common::{AppError, AppResult};
use shopdesk_db::{
    entities::{
        suspension_request::{self, ManagerDecision, SuspensionStatus},
        user,
    },
    repositories::{SuspensionRequestRepository, UserRepository},
};
use validator::Validate;

/// Timestamp format used in view records.
pub const VIEW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

const NOT_PENDING_MANAGER: &str = "This request is not pending manager review.";

/// Manager decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    /// Decision recorded in `manager_status`.
    #[must_use]
    pub const fn decision(self) -> ManagerDecision {
        match self {
            Self::Approve => ManagerDecision::Approved,
            Self::Reject => ManagerDecision::Rejected,
        }
    }

    /// Workflow state after the manager gate.
    #[must_use]
    pub const fn next_status(self) -> SuspensionStatus {
        match self {
            Self::Approve => SuspensionStatus::PendingOwner,
            Self::Reject => SuspensionStatus::RejectedManager,
        }
    }

    /// Confirmation message returned to the reviewer.
    #[must_use]
    pub const fn confirmation(self) -> &'static str {
        match self {
            Self::Approve => "Suspension request approved and forwarded to shop owner.",
            Self::Reject => "Suspension request rejected.",
        }
    }
}

impl FromStr for ReviewAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            _ => Err(AppError::Validation(
                "The selected action is invalid.".to_string(),
            )),
        }
    }
}

/// Validated input for a manager review.
#[derive(Debug, Clone, Validate)]
pub struct ReviewInput {
    pub action: ReviewAction,

    #[validate(length(min = 3, message = "The note field must be at least 3 characters."))]
    pub note: Option<String>,
}

impl ReviewInput {
    /// Build review input from raw request fields.
    ///
    /// Blank notes are treated as absent. Fails with `Validation` when the
    /// action is missing or unknown, or the note is too short.
    pub fn parse(action: Option<&str>, note: Option<String>) -> AppResult<Self> {
        let action = action
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| AppError::Validation("The action field is required.".to_string()))?
            .parse()?;

        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let input = Self { action, note };
        input.validate()?;
        Ok(input)
    }
}

/// Result of a successful review.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub request: suspension_request::Model,
    pub message: &'static str,
}

/// Apply a manager decision to a request.
///
/// Pure transition function: fails with `InvalidState` unless the request is
/// `pending_manager`, otherwise sets all manager fields and the next status
/// together.
pub fn apply_manager_review(
    request: suspension_request::Model,
    manager_id: &str,
    input: &ReviewInput,
    reviewed_at: DateTime<Utc>,
) -> AppResult<suspension_request::ActiveModel> {
    if request.status != SuspensionStatus::PendingManager {
        return Err(AppError::InvalidState(NOT_PENDING_MANAGER.to_string()));
    }

    let mut model: suspension_request::ActiveModel = request.into();
    model.manager_id = Set(Some(manager_id.to_string()));
    model.manager_note = Set(input.note.clone());
    model.manager_reviewed_at = Set(Some(reviewed_at.into()));
    model.manager_status = Set(Some(input.action.decision()));
    model.status = Set(input.action.next_status());

    Ok(model)
}

/// Three-value status shown to managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagerViewLabel {
    Pending,
    Approved,
    Rejected,
}

impl ManagerViewLabel {
    /// Label for a persisted status.
    ///
    /// Anything past the manager gate other than a manager rejection reads as
    /// `approved`, including an owner rejection.
    #[must_use]
    pub const fn from_status(status: SuspensionStatus) -> Self {
        match status {
            SuspensionStatus::PendingManager => Self::Pending,
            SuspensionStatus::RejectedManager => Self::Rejected,
            SuspensionStatus::PendingOwner
            | SuspensionStatus::Approved
            | SuspensionStatus::RejectedOwner => Self::Approved,
        }
    }

    /// Persisted statuses that project onto this label.
    #[must_use]
    pub const fn statuses(self) -> &'static [SuspensionStatus] {
        match self {
            Self::Pending => &[SuspensionStatus::PendingManager],
            Self::Approved => &[
                SuspensionStatus::PendingOwner,
                SuspensionStatus::Approved,
                SuspensionStatus::RejectedOwner,
            ],
            Self::Rejected => &[SuspensionStatus::RejectedManager],
        }
    }

    /// Parse a filter value. Unknown values yield `None` (no filtering).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Manager-facing projection of a suspension request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspensionRequestView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub reason: String,
    pub requested_at: String,
    pub status: ManagerViewLabel,
    pub approved_by: Option<String>,
    pub approval_date: Option<String>,
    pub approval_note: Option<String>,
    pub rejection_reason: Option<String>,
}

/// The manager's note, but only when the manager rejected the request.
#[must_use]
pub fn rejection_reason(request: &suspension_request::Model) -> Option<String> {
    match request.manager_status {
        Some(ManagerDecision::Rejected) => request.manager_note.clone(),
        _ => None,
    }
}

impl SuspensionRequestView {
    /// Project a request with its requester and reviewer, when known.
    #[must_use]
    pub fn project(
        request: &suspension_request::Model,
        requester: Option<&user::Model>,
        reviewer: Option<&user::Model>,
    ) -> Self {
        Self {
            id: request.id.clone(),
            name: requester.map(user::Model::display_name).unwrap_or_default(),
            email: requester.map(|u| u.email.clone()).unwrap_or_default(),
            reason: request.reason.clone(),
            requested_at: request
                .created_at
                .format(VIEW_TIMESTAMP_FORMAT)
                .to_string(),
            status: ManagerViewLabel::from_status(request.status),
            approved_by: reviewer.map(user::Model::display_name),
            approval_date: request
                .manager_reviewed_at
                .map(|t| t.format(VIEW_TIMESTAMP_FORMAT).to_string()),
            approval_note: request.manager_note.clone(),
            rejection_reason: rejection_reason(request),
        }
    }
}

/// Number of requests per manager view label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ManagerViewCounts {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

impl ManagerViewCounts {
    /// Fold per-status counts into label counts.
    #[must_use]
    pub fn from_status_counts(counts: &[(SuspensionStatus, i64)]) -> Self {
        counts
            .iter()
            .fold(Self::default(), |mut acc, (status, total)| {
                let total = u64::try_from(*total).unwrap_or(0);
                match ManagerViewLabel::from_status(*status) {
                    ManagerViewLabel::Pending => acc.pending += total,
                    ManagerViewLabel::Approved => acc.approved += total,
                    ManagerViewLabel::Rejected => acc.rejected += total,
                }
                acc
            })
    }
}

/// Suspension request service for the manager gate.
#[derive(Clone)]
pub struct SuspensionRequestService {
    request_repo: SuspensionRequestRepository,
    user_repo: UserRepository,
}

impl SuspensionRequestService {
    /// Create a new suspension request service.
    #[must_use]
    pub const fn new(request_repo: SuspensionRequestRepository, user_repo: UserRepository) -> Self {
        Self {
            request_repo,
            user_repo,
        }
    }

    /// Record a manager decision on a pending request.
    ///
    /// The status check and the update run under a row lock, so of two
    /// concurrent reviews only one succeeds; the other gets `InvalidState`.
    pub async fn review(
        &self,
        manager_id: &str,
        request_id: &str,
        input: ReviewInput,
    ) -> AppResult<ReviewOutcome> {
        input.validate()?;

        let now = Utc::now();
        let request = self
            .request_repo
            .update_locked(request_id, |current| {
                apply_manager_review(current, manager_id, &input, now)
            })
            .await?;

        tracing::info!(
            request_id = request_id,
            manager_id = manager_id,
            status = ?request.status,
            "Suspension request reviewed by manager"
        );

        Ok(ReviewOutcome {
            request,
            message: input.action.confirmation(),
        })
    }

    /// List requests for the manager view, newest first.
    pub async fn list_for_manager(
        &self,
        filter: Option<ManagerViewLabel>,
    ) -> AppResult<Vec<SuspensionRequestView>> {
        let requests = self
            .request_repo
            .find_by_statuses(filter.map(ManagerViewLabel::statuses))
            .await?;

        self.project_all(&requests).await
    }

    /// Get a single request in the manager view.
    pub async fn get_one(&self, request_id: &str) -> AppResult<SuspensionRequestView> {
        let request = self.request_repo.get_by_id(request_id).await?;
        let mut views = self.project_all(std::slice::from_ref(&request)).await?;

        views
            .pop()
            .ok_or_else(|| AppError::Internal("projection produced no view".to_string()))
    }

    /// Count requests per manager view label.
    pub async fn counts(&self) -> AppResult<ManagerViewCounts> {
        let counts = self.request_repo.count_by_status().await?;
        Ok(ManagerViewCounts::from_status_counts(&counts))
    }

    async fn project_all(
        &self,
        requests: &[suspension_request::Model],
    ) -> AppResult<Vec<SuspensionRequestView>> {
        let mut user_ids: Vec<String> = requests
            .iter()
            .flat_map(|r| std::iter::once(r.requester_id.clone()).chain(r.manager_id.clone()))
            .collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let users: HashMap<String, user::Model> = self
            .user_repo
            .find_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        Ok(requests
            .iter()
            .map(|r| {
                SuspensionRequestView::project(
                    r,
                    users.get(&r.requester_id),
                    r.manager_id.as_ref().and_then(|id| users.get(id)),
                )
            })
            .collect())
    }
}
