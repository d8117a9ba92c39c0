//! Database entities.

pub mod employee;
pub mod suspension_request;
pub mod user;

pub use employee::Entity as Employee;
pub use suspension_request::Entity as SuspensionRequest;
pub use user::Entity as User;
