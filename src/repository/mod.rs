use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
use crate::domain::activity::Activity;
use crate::domain::admin::{Admin, NewAdmin};
use crate::domain::category::{Category, MilestoneTemplate};
use crate::domain::progress::ProgressSummary;
use crate::domain::student::{CreatedStudent, NewStudent, Student};
use crate::domain::student_milestone::{MilestoneUpdate, StudentMilestone, StudentMilestoneDetail};
use crate::domain::types::{AdminEmail, AdminId, StudentId, StudentMilestoneId};

pub mod activity;
pub mod admin;
pub mod category;
pub mod errors;
pub mod student;
pub mod student_milestone;
#[cfg(test)]
pub mod test;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations for admin accounts.
pub trait AdminReader {
    /// Retrieve an admin by login email.
    fn get_admin_by_email(&self, email: &AdminEmail) -> RepositoryResult<Option<Admin>>;
    /// Retrieve an admin by identifier.
    fn get_admin_by_id(&self, id: AdminId) -> RepositoryResult<Option<Admin>>;
}

/// Write operations for admin accounts.
pub trait AdminWriter {
    /// Persist a new admin and return the stored row.
    fn create_admin(&self, admin: &NewAdmin) -> RepositoryResult<Admin>;
}

/// Read-only access to the category and milestone template reference data.
pub trait CategoryReader {
    /// List categories in display order.
    fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
    /// List active milestone templates in display order.
    fn list_active_templates(&self) -> RepositoryResult<Vec<MilestoneTemplate>>;
}

/// Read-only operations for students.
pub trait StudentReader {
    /// List all students ordered by name.
    fn list_students(&self) -> RepositoryResult<Vec<Student>>;
    /// Retrieve a student by identifier.
    fn get_student_by_id(&self, id: StudentId) -> RepositoryResult<Option<Student>>;
    /// Milestone status counts for every student that has milestone rows.
    fn list_progress_summaries(&self) -> RepositoryResult<HashMap<StudentId, ProgressSummary>>;
}

/// Write operations for students.
pub trait StudentWriter {
    /// Create a student together with one `not-started` milestone row per
    /// active template and a `student_created` activity entry.
    fn create_student_with_milestones(
        &self,
        student: &NewStudent,
    ) -> RepositoryResult<CreatedStudent>;
    /// Delete a student; milestone rows and activity cascade.
    fn delete_student(&self, id: StudentId) -> RepositoryResult<usize>;
}

/// Read-only operations for student milestones.
pub trait StudentMilestoneReader {
    /// List a student's milestones joined with template and category, ordered
    /// by category display order, then template display order.
    fn list_student_milestones(
        &self,
        student_id: StudentId,
    ) -> RepositoryResult<Vec<StudentMilestoneDetail>>;
    /// Retrieve one milestone row scoped to its student.
    fn get_student_milestone(
        &self,
        id: StudentMilestoneId,
        student_id: StudentId,
    ) -> RepositoryResult<Option<StudentMilestone>>;
}

/// Write operations for student milestones.
pub trait StudentMilestoneWriter {
    /// Apply status updates to rows of one student in a single transaction.
    ///
    /// Each row is read inside the transaction and its new timestamps are
    /// derived from that read. Rows already at their target are skipped.
    /// Fails with [`RepositoryError::NotFound`] and rolls back if any row does
    /// not belong to the student. Each changed row is recorded in the
    /// activity log and returned as stored.
    fn update_student_milestones(
        &self,
        student_id: StudentId,
        updates: &[MilestoneUpdate],
        actor: AdminId,
        now: NaiveDateTime,
    ) -> RepositoryResult<Vec<StudentMilestone>>;
}

/// Read-only operations for the activity log.
pub trait ActivityReader {
    /// Most recent entries for a student, newest first.
    fn list_recent_activity(
        &self,
        student_id: StudentId,
        limit: i64,
    ) -> RepositoryResult<Vec<Activity>>;
}
