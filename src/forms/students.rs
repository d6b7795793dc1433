use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::student::NewStudent;
use crate::domain::types::{
    AdminId, AvatarUrl, GuardianEmail, GuardianName, GuardianPhone, StudentName, StudentStatus,
    TypeConstraintError,
};

/// Treat blank optional inputs as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Deserialize, Validate)]
pub struct AddStudentForm {
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    #[validate(length(min = 1))]
    pub date_of_birth: String,
    pub gender: Option<String>,
    pub avatar_url: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub parent_name: String,
    pub parent_email: Option<String>,
    pub parent_phone: Option<String>,
    pub address: Option<String>,
    pub allergies: Option<String>,
    pub medical_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddStudentFormPayload {
    pub full_name: StudentName,
    pub date_of_birth: NaiveDate,
    pub gender: Option<String>,
    pub avatar_url: Option<AvatarUrl>,
    pub parent_name: GuardianName,
    pub parent_email: Option<GuardianEmail>,
    pub parent_phone: Option<GuardianPhone>,
    pub address: Option<String>,
    pub allergies: Option<String>,
    pub medical_notes: Option<String>,
}

impl AddStudentFormPayload {
    pub fn into_new_student(self, created_by: AdminId) -> NewStudent {
        let now = Utc::now().naive_utc();
        NewStudent {
            full_name: self.full_name,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            avatar_url: self.avatar_url,
            parent_name: self.parent_name,
            parent_email: self.parent_email,
            parent_phone: self.parent_phone,
            address: self.address,
            allergies: self.allergies,
            medical_notes: self.medical_notes,
            status: StudentStatus::Active,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Error)]
pub enum AddStudentFormError {
    #[error("Add student form validation failed: {0}")]
    Validation(String),
    #[error("Add student form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Date of birth must be a date in YYYY-MM-DD format")]
    InvalidDate,
    #[error("Date of birth cannot be in the future")]
    FutureDate,
}

impl From<ValidationErrors> for AddStudentFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddStudentFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl AddStudentForm {
    /// Validate the form relative to `today`.
    pub fn into_payload(
        self,
        today: NaiveDate,
    ) -> Result<AddStudentFormPayload, AddStudentFormError> {
        self.validate()?;

        let date_of_birth = NaiveDate::parse_from_str(self.date_of_birth.trim(), "%Y-%m-%d")
            .map_err(|_| AddStudentFormError::InvalidDate)?;
        if date_of_birth > today {
            return Err(AddStudentFormError::FutureDate);
        }

        Ok(AddStudentFormPayload {
            full_name: StudentName::new(self.full_name)?,
            date_of_birth,
            gender: non_blank(self.gender),
            avatar_url: non_blank(self.avatar_url).map(AvatarUrl::new).transpose()?,
            parent_name: GuardianName::new(self.parent_name)?,
            parent_email: non_blank(self.parent_email)
                .map(GuardianEmail::new)
                .transpose()?,
            parent_phone: non_blank(self.parent_phone)
                .map(GuardianPhone::new)
                .transpose()?,
            address: non_blank(self.address),
            allergies: non_blank(self.allergies),
            medical_notes: non_blank(self.medical_notes),
        })
    }
}

impl TryFrom<AddStudentForm> for AddStudentFormPayload {
    type Error = AddStudentFormError;

    fn try_from(value: AddStudentForm) -> Result<Self, Self::Error> {
        value.into_payload(Utc::now().date_naive())
    }
}
