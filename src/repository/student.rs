use std::collections::HashMap;

use diesel::prelude::*;

use crate::domain::progress::ProgressSummary;
use crate::domain::student::{CreatedStudent, NewStudent, Student};
use crate::domain::types::{ActivityKind, MilestoneStatus, StudentId};
use crate::models::student::{NewStudent as DbNewStudent, Student as DbStudent};
use crate::models::student_milestone::NewStudentMilestone;
use crate::repository::activity::record_activity;
use crate::repository::category::load_active_templates;
use crate::repository::{
    DieselRepository, RepositoryError, RepositoryResult, StudentReader, StudentWriter,
};

impl StudentReader for DieselRepository {
    fn list_students(&self) -> RepositoryResult<Vec<Student>> {
        use crate::schema::students;

        let mut conn = self.conn()?;

        let items = students::table
            .order((students::full_name.asc(), students::id.asc()))
            .select(DbStudent::as_select())
            .load::<DbStudent>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Student>, _>>()?;

        Ok(items)
    }

    fn get_student_by_id(&self, id: StudentId) -> RepositoryResult<Option<Student>> {
        use crate::schema::students;

        let mut conn = self.conn()?;

        let student = students::table
            .filter(students::id.eq(id.get()))
            .select(DbStudent::as_select())
            .first::<DbStudent>(&mut conn)
            .optional()?;

        Ok(student.map(TryInto::try_into).transpose()?)
    }

    fn list_progress_summaries(&self) -> RepositoryResult<HashMap<StudentId, ProgressSummary>> {
        use crate::schema::student_milestones;

        let mut conn = self.conn()?;

        let rows: Vec<(i32, String)> = student_milestones::table
            .select((student_milestones::student_id, student_milestones::status))
            .load(&mut conn)?;

        let mut summaries: HashMap<StudentId, ProgressSummary> = HashMap::new();
        for (student_id, status) in rows {
            let student_id = StudentId::new(student_id)?;
            let status = MilestoneStatus::try_from(status.as_str())?;
            summaries.entry(student_id).or_default().record(status);
        }

        Ok(summaries)
    }
}

impl StudentWriter for DieselRepository {
    fn create_student_with_milestones(
        &self,
        student: &NewStudent,
    ) -> RepositoryResult<CreatedStudent> {
        use crate::schema::{student_milestones, students};

        let mut conn = self.conn()?;
        let db_student: DbNewStudent = student.into();

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let stored: Student = diesel::insert_into(students::table)
                .values(&db_student)
                .returning(DbStudent::as_returning())
                .get_result::<DbStudent>(conn)?
                .try_into()?;

            let templates = load_active_templates(conn)?;

            let rows = templates
                .iter()
                .map(|template| NewStudentMilestone {
                    student_id: stored.id.get(),
                    milestone_template_id: template.id,
                    status: MilestoneStatus::NotStarted.as_str(),
                    updated_by: Some(student.created_by.get()),
                    updated_at: student.created_at,
                })
                .collect::<Vec<_>>();

            let milestone_count = if rows.is_empty() {
                0
            } else {
                diesel::insert_into(student_milestones::table)
                    .values(&rows)
                    .execute(conn)?
            };

            record_activity(
                conn,
                stored.id,
                student.created_by,
                ActivityKind::StudentCreated,
                &format!("Student profile created for {}", stored.full_name),
                student.created_at,
            )?;

            Ok(CreatedStudent {
                student: stored,
                milestone_count,
            })
        })
    }

    fn delete_student(&self, id: StudentId) -> RepositoryResult<usize> {
        use crate::schema::students;

        let mut conn = self.conn()?;

        let affected =
            diesel::delete(students::table.filter(students::id.eq(id.get()))).execute(&mut conn)?;

        Ok(affected)
    }
}
