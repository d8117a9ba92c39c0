//! Business logic services.

#![allow(missing_docs)]

pub mod suspension_request;
pub mod user;

pub use suspension_request::{
    ManagerViewCounts, ManagerViewLabel, ReviewAction, ReviewInput, ReviewOutcome,
    SuspensionRequestService, SuspensionRequestView,
};
pub use user::{UserService, require_manager};
