use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::activity::Activity as DomainActivity;
use crate::domain::types::{ActivityDescription, ActivityKind, TypeConstraintError};

/// Diesel model representing the `activity_log` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::activity_log)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Activity {
    pub id: i32,
    pub student_id: i32,
    pub admin_id: i32,
    pub action_type: String,
    pub description: String,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Activity`].
#[derive(Insertable)]
#[diesel(table_name = crate::schema::activity_log)]
pub struct NewActivity<'a> {
    pub student_id: i32,
    pub admin_id: i32,
    pub action_type: &'a str,
    pub description: &'a str,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Activity> for DomainActivity {
    type Error = TypeConstraintError;

    fn try_from(activity: Activity) -> Result<Self, Self::Error> {
        Ok(Self {
            id: activity.id.try_into()?,
            student_id: activity.student_id.try_into()?,
            admin_id: activity.admin_id.try_into()?,
            kind: ActivityKind::try_from(activity.action_type.as_str())?,
            description: ActivityDescription::new(activity.description)?,
            created_at: activity.created_at,
        })
    }
}
