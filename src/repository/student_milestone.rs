use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::student_milestone::{MilestoneUpdate, StudentMilestone, StudentMilestoneDetail};
use crate::domain::types::{ActivityKind, AdminId, StudentId, StudentMilestoneId};
use crate::models::category::{Category as DbCategory, MilestoneTemplate as DbTemplate};
use crate::models::student_milestone::{
    StudentMilestone as DbStudentMilestone, StudentMilestoneStatusChange,
};
use crate::repository::activity::record_activity;
use crate::repository::{
    DieselRepository, RepositoryError, RepositoryResult, StudentMilestoneReader,
    StudentMilestoneWriter,
};

impl StudentMilestoneReader for DieselRepository {
    fn list_student_milestones(
        &self,
        student_id: StudentId,
    ) -> RepositoryResult<Vec<StudentMilestoneDetail>> {
        use crate::schema::{milestone_categories, milestone_templates, student_milestones};

        let mut conn = self.conn()?;

        let items = student_milestones::table
            .inner_join(milestone_templates::table.inner_join(milestone_categories::table))
            .filter(student_milestones::student_id.eq(student_id.get()))
            .order((
                milestone_categories::display_order.asc(),
                milestone_categories::id.asc(),
                milestone_templates::display_order.asc(),
                student_milestones::id.asc(),
            ))
            .select((
                DbStudentMilestone::as_select(),
                DbTemplate::as_select(),
                DbCategory::as_select(),
            ))
            .load::<(DbStudentMilestone, DbTemplate, DbCategory)>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<StudentMilestoneDetail>, _>>()?;

        Ok(items)
    }

    fn get_student_milestone(
        &self,
        id: StudentMilestoneId,
        student_id: StudentId,
    ) -> RepositoryResult<Option<StudentMilestone>> {
        use crate::schema::student_milestones;

        let mut conn = self.conn()?;

        let row = student_milestones::table
            .filter(student_milestones::id.eq(id.get()))
            .filter(student_milestones::student_id.eq(student_id.get()))
            .select(DbStudentMilestone::as_select())
            .first::<DbStudentMilestone>(&mut conn)
            .optional()?;

        Ok(row.map(TryInto::try_into).transpose()?)
    }
}

impl StudentMilestoneWriter for DieselRepository {
    fn update_student_milestones(
        &self,
        student_id: StudentId,
        updates: &[MilestoneUpdate],
        actor: AdminId,
        now: NaiveDateTime,
    ) -> RepositoryResult<Vec<StudentMilestone>> {
        use crate::schema::{milestone_templates, student_milestones};

        let mut conn = self.conn()?;

        // Take the write lock up front so no other writer can change a row
        // between the read below and the update that depends on it.
        conn.immediate_transaction::<_, RepositoryError, _>(|conn| {
            let mut changed = Vec::with_capacity(updates.len());

            for update in updates {
                let current: StudentMilestone = student_milestones::table
                    .filter(student_milestones::id.eq(update.id.get()))
                    .filter(student_milestones::student_id.eq(student_id.get()))
                    .select(DbStudentMilestone::as_select())
                    .first::<DbStudentMilestone>(conn)
                    .optional()?
                    .ok_or(RepositoryError::NotFound)?
                    .try_into()?;

                let progress = update.target.apply(current.progress(), now);
                if progress == current.progress() {
                    continue;
                }

                diesel::update(student_milestones::table.find(current.id.get()))
                    .set(StudentMilestoneStatusChange {
                        status: progress.status.as_str(),
                        started_at: progress.started_at,
                        completed_at: progress.completed_at,
                        updated_by: Some(actor.get()),
                        updated_at: now,
                    })
                    .execute(conn)?;

                let description: String = milestone_templates::table
                    .find(current.milestone_template_id.get())
                    .select(milestone_templates::description)
                    .first(conn)?;

                record_activity(
                    conn,
                    student_id,
                    actor,
                    ActivityKind::MilestoneUpdated,
                    &format!("\"{description}\" marked {}", progress.status.label()),
                    now,
                )?;

                changed.push(StudentMilestone {
                    status: progress.status,
                    started_at: progress.started_at,
                    completed_at: progress.completed_at,
                    updated_by: Some(actor),
                    updated_at: now,
                    ..current
                });
            }

            Ok(changed)
        })
    }
}
