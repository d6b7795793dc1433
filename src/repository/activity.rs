use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::activity::Activity;
use crate::domain::types::{ActivityKind, AdminId, StudentId};
use crate::models::activity::{Activity as DbActivity, NewActivity};
use crate::repository::{ActivityReader, DieselRepository, RepositoryResult};

impl ActivityReader for DieselRepository {
    fn list_recent_activity(
        &self,
        student_id: StudentId,
        limit: i64,
    ) -> RepositoryResult<Vec<Activity>> {
        use crate::schema::activity_log;

        let mut conn = self.conn()?;

        let items = activity_log::table
            .filter(activity_log::student_id.eq(student_id.get()))
            .order((activity_log::created_at.desc(), activity_log::id.desc()))
            .limit(limit)
            .select(DbActivity::as_select())
            .load::<DbActivity>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Activity>, _>>()?;

        Ok(items)
    }
}

/// Append an activity entry using an already open connection, so callers can
/// record it inside their own transaction.
pub(crate) fn record_activity(
    conn: &mut SqliteConnection,
    student_id: StudentId,
    admin_id: AdminId,
    kind: ActivityKind,
    description: &str,
    created_at: NaiveDateTime,
) -> QueryResult<usize> {
    use crate::schema::activity_log;

    diesel::insert_into(activity_log::table)
        .values(NewActivity {
            student_id: student_id.get(),
            admin_id: admin_id.get(),
            action_type: kind.as_str(),
            description,
            created_at,
        })
        .execute(conn)
}
