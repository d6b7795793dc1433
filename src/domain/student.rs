use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AdminId, AvatarUrl, GuardianEmail, GuardianName, GuardianPhone, StudentId, StudentName,
    StudentStatus,
};

/// A child whose milestones are being tracked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: StudentId,
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
    pub status: StudentStatus,
    pub created_by: AdminId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Data required to insert a new [`Student`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewStudent {
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
    pub status: StudentStatus,
    pub created_by: AdminId,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Outcome of creating a student together with its milestone rows.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedStudent {
    pub student: Student,
    pub milestone_count: usize,
}
