use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime};

use crate::domain::activity::Activity;
use crate::domain::admin::{Admin, NewAdmin};
use crate::domain::category::{Category, MilestoneTemplate};
use crate::domain::progress::ProgressSummary;
use crate::domain::student::{CreatedStudent, NewStudent, Student};
use crate::domain::student_milestone::{MilestoneUpdate, StudentMilestone, StudentMilestoneDetail};
use crate::domain::types::{
    ActivityDescription, ActivityId, ActivityKind, AdminEmail, AdminId, MilestoneStatus, StudentId,
    StudentMilestoneId,
};
use crate::repository::{
    ActivityReader, AdminReader, AdminWriter, CategoryReader, RepositoryError, RepositoryResult,
    StudentMilestoneReader, StudentMilestoneWriter, StudentReader, StudentWriter,
};

fn epoch() -> NaiveDateTime {
    DateTime::from_timestamp(0, 0).unwrap().naive_utc()
}

/// Simple in-memory repository used for unit tests.
#[derive(Default)]
pub struct TestRepository {
    admins: RefCell<Vec<Admin>>,
    categories: Vec<Category>,
    templates: Vec<MilestoneTemplate>,
    students: RefCell<Vec<Student>>,
    milestones: RefCell<Vec<StudentMilestone>>,
    activity: RefCell<Vec<Activity>>,
    fail_writes: bool,
}

impl TestRepository {
    pub fn new(categories: Vec<Category>, templates: Vec<MilestoneTemplate>) -> Self {
        Self {
            categories,
            templates,
            ..Self::default()
        }
    }

    pub fn with_students(self, students: Vec<Student>) -> Self {
        self.students.replace(students);
        self
    }

    pub fn with_activity(self, activity: Vec<Activity>) -> Self {
        self.activity.replace(activity);
        self
    }

    /// Make every write operation fail with a database error.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn milestones(&self) -> Vec<StudentMilestone> {
        self.milestones.borrow().clone()
    }

    pub fn students(&self) -> Vec<Student> {
        self.students.borrow().clone()
    }

    pub fn activity(&self) -> Vec<Activity> {
        self.activity.borrow().clone()
    }

    fn check_writes(&self) -> RepositoryResult<()> {
        if self.fail_writes {
            Err(RepositoryError::Database(diesel::result::Error::RollbackTransaction))
        } else {
            Ok(())
        }
    }
}

impl AdminReader for TestRepository {
    fn get_admin_by_email(&self, email: &AdminEmail) -> RepositoryResult<Option<Admin>> {
        Ok(self
            .admins
            .borrow()
            .iter()
            .find(|a| &a.email == email)
            .cloned())
    }

    fn get_admin_by_id(&self, id: AdminId) -> RepositoryResult<Option<Admin>> {
        Ok(self.admins.borrow().iter().find(|a| a.id == id).cloned())
    }
}

impl AdminWriter for TestRepository {
    fn create_admin(&self, admin: &NewAdmin) -> RepositoryResult<Admin> {
        self.check_writes()?;
        let mut admins = self.admins.borrow_mut();
        let stored = Admin {
            id: AdminId::new(admins.len() as i32 + 1)?,
            email: admin.email.clone(),
            password_hash: admin.password_hash.clone(),
            created_at: epoch(),
        };
        admins.push(stored.clone());
        Ok(stored)
    }
}

impl CategoryReader for TestRepository {
    fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
        Ok(self.categories.clone())
    }

    fn list_active_templates(&self) -> RepositoryResult<Vec<MilestoneTemplate>> {
        Ok(self
            .templates
            .iter()
            .filter(|t| t.is_active)
            .cloned()
            .collect())
    }
}

impl StudentReader for TestRepository {
    fn list_students(&self) -> RepositoryResult<Vec<Student>> {
        Ok(self.students.borrow().clone())
    }

    fn get_student_by_id(&self, id: StudentId) -> RepositoryResult<Option<Student>> {
        Ok(self.students.borrow().iter().find(|s| s.id == id).cloned())
    }

    fn list_progress_summaries(&self) -> RepositoryResult<HashMap<StudentId, ProgressSummary>> {
        let mut summaries: HashMap<StudentId, ProgressSummary> = HashMap::new();
        for row in self.milestones.borrow().iter() {
            summaries.entry(row.student_id).or_default().record(row.status);
        }
        Ok(summaries)
    }
}

impl StudentWriter for TestRepository {
    fn create_student_with_milestones(
        &self,
        student: &NewStudent,
    ) -> RepositoryResult<CreatedStudent> {
        self.check_writes()?;

        let mut students = self.students.borrow_mut();
        let stored = Student {
            id: StudentId::new(students.len() as i32 + 1)?,
            full_name: student.full_name.clone(),
            date_of_birth: student.date_of_birth,
            gender: student.gender.clone(),
            avatar_url: student.avatar_url.clone(),
            parent_name: student.parent_name.clone(),
            parent_email: student.parent_email.clone(),
            parent_phone: student.parent_phone.clone(),
            address: student.address.clone(),
            allergies: student.allergies.clone(),
            medical_notes: student.medical_notes.clone(),
            status: student.status,
            created_by: student.created_by,
            created_at: student.created_at,
            updated_at: student.updated_at,
        };
        students.push(stored.clone());

        let mut milestones = self.milestones.borrow_mut();
        let templates = self.list_active_templates()?;
        for template in &templates {
            let id = StudentMilestoneId::new(milestones.len() as i32 + 1)?;
            milestones.push(StudentMilestone {
                id,
                student_id: stored.id,
                milestone_template_id: template.id,
                status: MilestoneStatus::NotStarted,
                started_at: None,
                completed_at: None,
                updated_by: Some(student.created_by),
                updated_at: student.created_at,
            });
        }

        Ok(CreatedStudent {
            student: stored,
            milestone_count: templates.len(),
        })
    }

    fn delete_student(&self, id: StudentId) -> RepositoryResult<usize> {
        self.check_writes()?;
        let mut students = self.students.borrow_mut();
        let before = students.len();
        students.retain(|s| s.id != id);
        self.milestones.borrow_mut().retain(|m| m.student_id != id);
        Ok(before - students.len())
    }
}

impl StudentMilestoneReader for TestRepository {
    fn list_student_milestones(
        &self,
        student_id: StudentId,
    ) -> RepositoryResult<Vec<StudentMilestoneDetail>> {
        let mut items = Vec::new();
        for row in self
            .milestones
            .borrow()
            .iter()
            .filter(|m| m.student_id == student_id)
        {
            let Some(template) = self
                .templates
                .iter()
                .find(|t| t.id == row.milestone_template_id)
            else {
                return Err(RepositoryError::NotFound);
            };
            let Some(category) = self.categories.iter().find(|c| c.id == template.category_id)
            else {
                return Err(RepositoryError::NotFound);
            };
            items.push(StudentMilestoneDetail {
                id: row.id,
                student_id: row.student_id,
                status: row.status,
                started_at: row.started_at,
                completed_at: row.completed_at,
                updated_by: row.updated_by,
                milestone: template.clone(),
                category: category.clone(),
            });
        }
        Ok(items)
    }

    fn get_student_milestone(
        &self,
        id: StudentMilestoneId,
        student_id: StudentId,
    ) -> RepositoryResult<Option<StudentMilestone>> {
        Ok(self
            .milestones
            .borrow()
            .iter()
            .find(|m| m.id == id && m.student_id == student_id)
            .cloned())
    }
}

impl StudentMilestoneWriter for TestRepository {
    fn update_student_milestones(
        &self,
        student_id: StudentId,
        updates: &[MilestoneUpdate],
        actor: AdminId,
        now: NaiveDateTime,
    ) -> RepositoryResult<Vec<StudentMilestone>> {
        self.check_writes()?;

        // Work on copies so a missing row leaves everything untouched.
        let mut milestones = self.milestones.borrow().clone();
        let mut activity = self.activity.borrow().clone();
        let mut changed = Vec::new();

        for update in updates {
            let Some(row) = milestones
                .iter_mut()
                .find(|m| m.id == update.id && m.student_id == student_id)
            else {
                return Err(RepositoryError::NotFound);
            };

            let progress = update.target.apply(row.progress(), now);
            if progress == row.progress() {
                continue;
            }
            row.status = progress.status;
            row.started_at = progress.started_at;
            row.completed_at = progress.completed_at;
            row.updated_by = Some(actor);
            row.updated_at = now;

            let Some(template) = self
                .templates
                .iter()
                .find(|t| t.id == row.milestone_template_id)
            else {
                return Err(RepositoryError::NotFound);
            };
            activity.push(Activity {
                id: ActivityId::new(activity.len() as i32 + 1)?,
                student_id,
                admin_id: actor,
                kind: ActivityKind::MilestoneUpdated,
                description: ActivityDescription::new(format!(
                    "\"{}\" marked {}",
                    template.description.as_str(),
                    progress.status.label()
                ))?,
                created_at: now,
            });
            changed.push(row.clone());
        }

        self.milestones.replace(milestones);
        self.activity.replace(activity);
        Ok(changed)
    }
}

impl ActivityReader for TestRepository {
    fn list_recent_activity(
        &self,
        student_id: StudentId,
        limit: i64,
    ) -> RepositoryResult<Vec<Activity>> {
        let mut items: Vec<Activity> = self
            .activity
            .borrow()
            .iter()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        items.truncate(limit.max(0) as usize);
        Ok(items)
    }
}
