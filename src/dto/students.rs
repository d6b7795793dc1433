use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::domain::activity::Activity;
use crate::domain::progress::ProgressSummary;
use crate::domain::student::Student;
use crate::dto::milestones::CategoryGroupDto;

/// Age in whole years on `today`.
fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age.max(0)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentDto {
    pub id: i32,
    pub full_name: String,
    pub date_of_birth: String,
    pub age: i32,
    pub gender: Option<String>,
    pub avatar_url: Option<String>,
    pub parent_name: String,
    pub parent_email: Option<String>,
    pub parent_phone: Option<String>,
    pub address: Option<String>,
    pub allergies: Option<String>,
    pub medical_notes: Option<String>,
    pub status: String,
}

impl StudentDto {
    pub fn new(value: Student, today: NaiveDate) -> Self {
        Self {
            id: value.id.get(),
            age: age_in_years(value.date_of_birth, today),
            date_of_birth: value.date_of_birth.format("%Y-%m-%d").to_string(),
            full_name: value.full_name.into_inner(),
            gender: value.gender,
            avatar_url: value.avatar_url.map(|u| u.into_inner()),
            parent_name: value.parent_name.into_inner(),
            parent_email: value.parent_email.map(|e| e.into_inner()),
            parent_phone: value.parent_phone.map(|p| p.into_inner()),
            address: value.address,
            allergies: value.allergies,
            medical_notes: value.medical_notes,
            status: value.status.as_str().to_string(),
        }
    }
}

/// Dashboard row: a student with their milestone counts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentProgressDto {
    pub student: StudentDto,
    pub progress: ProgressSummary,
    pub percent_mastered: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardDto {
    pub students: Vec<StudentProgressDto>,
    pub totals: ProgressSummary,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActivityDto {
    pub kind: String,
    pub description: String,
    pub created_at: String,
}

impl From<Activity> for ActivityDto {
    fn from(value: Activity) -> Self {
        Self {
            kind: value.kind.as_str().to_string(),
            description: value.description.into_inner(),
            created_at: value.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Everything the student page renders.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentPageDto {
    pub student: StudentDto,
    pub groups: Vec<CategoryGroupDto>,
    pub progress: ProgressSummary,
    pub percent_mastered: usize,
    pub activity: Vec<ActivityDto>,
}
