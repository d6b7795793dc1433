pub mod auth;
pub mod errors;
pub mod milestones;
pub mod reports;
pub mod students;

pub use errors::{ServiceError, ServiceResult};
