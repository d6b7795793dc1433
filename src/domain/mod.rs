//! Domain entities and value objects, independent of persistence and HTTP.

pub mod activity;
pub mod admin;
pub mod category;
pub mod progress;
pub mod student;
pub mod student_milestone;
pub mod types;
