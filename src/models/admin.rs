use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::admin::{Admin as DomainAdmin, NewAdmin as DomainNewAdmin};
use crate::domain::types::{AdminEmail, TypeConstraintError};

/// Diesel model representing the `admins` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::admins)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Admin {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Admin`].
#[derive(Insertable)]
#[diesel(table_name = crate::schema::admins)]
pub struct NewAdmin<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
}

impl TryFrom<Admin> for DomainAdmin {
    type Error = TypeConstraintError;

    fn try_from(admin: Admin) -> Result<Self, Self::Error> {
        Ok(Self {
            id: admin.id.try_into()?,
            email: AdminEmail::new(admin.email)?,
            password_hash: admin.password_hash,
            created_at: admin.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewAdmin> for NewAdmin<'a> {
    fn from(admin: &'a DomainNewAdmin) -> Self {
        Self {
            email: admin.email.as_str(),
            password_hash: admin.password_hash.as_str(),
        }
    }
}
