use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::student::{NewStudent as DomainNewStudent, Student as DomainStudent};
use crate::domain::types::{
    AvatarUrl, GuardianEmail, GuardianName, GuardianPhone, StudentName, StudentStatus,
    TypeConstraintError,
};

/// Diesel model representing the `students` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Student {
    pub id: i32,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Option<String>,
    pub avatar_url: Option<String>,
    pub parent_name: String,
    pub parent_email: Option<String>,
    pub parent_phone: Option<String>,
    pub address: Option<String>,
    pub allergies: Option<String>,
    pub medical_notes: Option<String>,
    pub status: String,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`Student`].
#[derive(Insertable)]
#[diesel(table_name = crate::schema::students)]
pub struct NewStudent<'a> {
    pub full_name: &'a str,
    pub date_of_birth: NaiveDate,
    pub gender: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
    pub parent_name: &'a str,
    pub parent_email: Option<&'a str>,
    pub parent_phone: Option<&'a str>,
    pub address: Option<&'a str>,
    pub allergies: Option<&'a str>,
    pub medical_notes: Option<&'a str>,
    pub status: &'a str,
    pub created_by: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Student> for DomainStudent {
    type Error = TypeConstraintError;

    fn try_from(student: Student) -> Result<Self, Self::Error> {
        Ok(Self {
            id: student.id.try_into()?,
            full_name: StudentName::new(student.full_name)?,
            date_of_birth: student.date_of_birth,
            gender: student.gender,
            avatar_url: student.avatar_url.map(AvatarUrl::new).transpose()?,
            parent_name: GuardianName::new(student.parent_name)?,
            parent_email: student.parent_email.map(GuardianEmail::new).transpose()?,
            parent_phone: student.parent_phone.map(GuardianPhone::new).transpose()?,
            address: student.address,
            allergies: student.allergies,
            medical_notes: student.medical_notes,
            status: StudentStatus::try_from(student.status.as_str())?,
            created_by: student.created_by.try_into()?,
            created_at: student.created_at,
            updated_at: student.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewStudent> for NewStudent<'a> {
    fn from(student: &'a DomainNewStudent) -> Self {
        Self {
            full_name: student.full_name.as_str(),
            date_of_birth: student.date_of_birth,
            gender: student.gender.as_deref(),
            avatar_url: student.avatar_url.as_ref().map(AvatarUrl::as_str),
            parent_name: student.parent_name.as_str(),
            parent_email: student.parent_email.as_ref().map(GuardianEmail::as_str),
            parent_phone: student.parent_phone.as_ref().map(GuardianPhone::as_str),
            address: student.address.as_deref(),
            allergies: student.allergies.as_deref(),
            medical_notes: student.medical_notes.as_deref(),
            status: student.status.as_str(),
            created_by: student.created_by.get(),
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}
