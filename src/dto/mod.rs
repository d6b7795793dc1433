//! View models handed to templates and JSON responses.

pub mod milestones;
pub mod students;
