//! Admin authentication backed by Argon2id password hashes.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::domain::admin::{Admin, AuthenticatedAdmin, NewAdmin};
use crate::domain::types::AdminEmail;
use crate::forms::auth::LoginFormPayload;
use crate::repository::{AdminReader, AdminWriter};

use super::{ServiceError, ServiceResult};

/// Hash a password into a PHC string with a random salt.
pub fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            log::error!("Failed to hash password: {e}");
            ServiceError::Internal
        })
}

/// Check `password` against a stored PHC hash.
pub fn verify_password(password: &str, hash: &str) -> ServiceResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| {
        log::error!("Invalid password hash format: {e}");
        ServiceError::Internal
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Verify login credentials and return the session identity.
pub fn login<R>(payload: LoginFormPayload, repo: &R) -> ServiceResult<AuthenticatedAdmin>
where
    R: AdminReader,
{
    let admin = match repo.get_admin_by_email(&payload.email) {
        Ok(Some(admin)) => admin,
        Ok(None) => {
            log::warn!("Login attempt for unknown admin {}", payload.email);
            return Err(ServiceError::Unauthorized);
        }
        Err(e) => {
            log::error!("Failed to load admin: {e}");
            return Err(ServiceError::Internal);
        }
    };

    if verify_password(&payload.password, &admin.password_hash)? {
        log::info!("Admin {} logged in", admin.email);
        Ok(AuthenticatedAdmin::from(&admin))
    } else {
        log::warn!("Rejected password for admin {}", admin.email);
        Err(ServiceError::Unauthorized)
    }
}

/// Create the configured admin account unless it already exists.
pub fn ensure_admin<R>(email: &str, password: &str, repo: &R) -> ServiceResult<Admin>
where
    R: AdminReader + AdminWriter,
{
    let email = AdminEmail::new(email)?;

    match repo.get_admin_by_email(&email) {
        Ok(Some(admin)) => return Ok(admin),
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to load admin: {e}");
            return Err(ServiceError::Internal);
        }
    }

    let new_admin = NewAdmin {
        email,
        password_hash: hash_password(password)?,
    };

    match repo.create_admin(&new_admin) {
        Ok(admin) => {
            log::info!("Created admin account {}", admin.email);
            Ok(admin)
        }
        Err(e) => {
            log::error!("Failed to create admin: {e}");
            Err(ServiceError::Internal)
        }
    }
}
