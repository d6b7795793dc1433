use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AdminEmail, AdminId};

/// Stored administrator account.
#[derive(Debug, Clone)]
pub struct Admin {
    pub id: AdminId,
    pub email: AdminEmail,
    /// PHC-formatted Argon2 hash.
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Data required to insert a new [`Admin`].
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub email: AdminEmail,
    pub password_hash: String,
}

/// Identity of the admin behind the current session.
///
/// This is what gets serialized into the identity cookie and handed to every
/// service call that needs an actor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedAdmin {
    pub id: AdminId,
    pub email: AdminEmail,
}

impl From<&Admin> for AuthenticatedAdmin {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email.clone(),
        }
    }
}
