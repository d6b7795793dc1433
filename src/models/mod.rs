//! Diesel row types and their conversions into domain entities.

pub mod activity;
pub mod admin;
pub mod category;
#[cfg(feature = "server")]
pub mod config;
pub mod student;
pub mod student_milestone;
