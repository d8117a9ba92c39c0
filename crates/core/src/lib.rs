//! Core business logic for shopdesk.

pub mod services;

pub use services::*;
