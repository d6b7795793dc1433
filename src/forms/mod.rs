//! Request payloads accepted by the HTTP layer.
//!
//! Each raw form derives `Deserialize` and `Validate` and converts into a
//! strongly-typed payload via `TryFrom`.

pub mod auth;
pub mod milestones;
pub mod students;
