//! Repositories wrapping sea-orm queries.

#![allow(missing_docs)]

pub mod suspension_request;
pub mod user;

pub use suspension_request::SuspensionRequestRepository;
pub use user::UserRepository;
