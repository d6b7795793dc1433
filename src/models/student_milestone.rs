use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::student_milestone::{
    StudentMilestone as DomainStudentMilestone, StudentMilestoneDetail,
};
use crate::domain::types::{AdminId, MilestoneStatus, TypeConstraintError};
use crate::models::category::{Category, MilestoneTemplate};

/// Diesel model representing the `student_milestones` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::student_milestones)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StudentMilestone {
    pub id: i32,
    pub student_id: i32,
    pub milestone_template_id: i32,
    pub status: String,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub updated_by: Option<i32>,
    pub updated_at: NaiveDateTime,
}

/// Insertable form of [`StudentMilestone`].
#[derive(Insertable)]
#[diesel(table_name = crate::schema::student_milestones)]
pub struct NewStudentMilestone<'a> {
    pub student_id: i32,
    pub milestone_template_id: i32,
    pub status: &'a str,
    pub updated_by: Option<i32>,
    pub updated_at: NaiveDateTime,
}

/// Patch applied when a milestone status changes.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::student_milestones)]
#[diesel(treat_none_as_null = true)]
pub struct StudentMilestoneStatusChange<'a> {
    pub status: &'a str,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub updated_by: Option<i32>,
    pub updated_at: NaiveDateTime,
}

fn parse_updated_by(value: Option<i32>) -> Result<Option<AdminId>, TypeConstraintError> {
    value.map(AdminId::new).transpose()
}

impl TryFrom<StudentMilestone> for DomainStudentMilestone {
    type Error = TypeConstraintError;

    fn try_from(row: StudentMilestone) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.try_into()?,
            student_id: row.student_id.try_into()?,
            milestone_template_id: row.milestone_template_id.try_into()?,
            status: MilestoneStatus::try_from(row.status.as_str())?,
            started_at: row.started_at,
            completed_at: row.completed_at,
            updated_by: parse_updated_by(row.updated_by)?,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<(StudentMilestone, MilestoneTemplate, Category)> for StudentMilestoneDetail {
    type Error = TypeConstraintError;

    fn try_from(
        (row, template, category): (StudentMilestone, MilestoneTemplate, Category),
    ) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.try_into()?,
            student_id: row.student_id.try_into()?,
            status: MilestoneStatus::try_from(row.status.as_str())?,
            started_at: row.started_at,
            completed_at: row.completed_at,
            updated_by: parse_updated_by(row.updated_by)?,
            milestone: template.try_into()?,
            category: category.try_into()?,
        })
    }
}
