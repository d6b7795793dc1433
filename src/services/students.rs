use chrono::Utc;

use crate::domain::admin::AuthenticatedAdmin;
use crate::domain::progress::{ProgressSummary, group_by_category};
use crate::domain::student::CreatedStudent;
use crate::domain::types::StudentId;
use crate::dto::milestones::CategoryGroupDto;
use crate::dto::students::{
    ActivityDto, DashboardDto, StudentDto, StudentPageDto, StudentProgressDto,
};
use crate::forms::students::AddStudentFormPayload;
use crate::repository::{ActivityReader, StudentMilestoneReader, StudentReader, StudentWriter};

use super::{ServiceError, ServiceResult};

/// Number of activity entries shown on the student page.
pub const RECENT_ACTIVITY_LIMIT: i64 = 10;

pub fn show_dashboard<R>(repo: &R) -> ServiceResult<DashboardDto>
where
    R: StudentReader,
{
    let students = repo.list_students().map_err(|e| {
        log::error!("Failed to list students: {e}");
        ServiceError::Internal
    })?;
    let summaries = repo.list_progress_summaries().map_err(|e| {
        log::error!("Failed to load progress summaries: {e}");
        ServiceError::Internal
    })?;

    let today = Utc::now().date_naive();
    let mut totals = ProgressSummary::default();
    let students = students
        .into_iter()
        .map(|student| {
            let progress = summaries.get(&student.id).copied().unwrap_or_default();
            totals.merge(&progress);
            StudentProgressDto {
                student: StudentDto::new(student, today),
                percent_mastered: progress.percent_mastered(),
                progress,
            }
        })
        .collect();

    Ok(DashboardDto { students, totals })
}

pub fn add_student<R>(
    payload: AddStudentFormPayload,
    admin: &AuthenticatedAdmin,
    repo: &R,
) -> ServiceResult<CreatedStudent>
where
    R: StudentWriter,
{
    let new_student = payload.into_new_student(admin.id);

    match repo.create_student_with_milestones(&new_student) {
        Ok(created) => {
            log::info!(
                "Admin {} created student {} with {} milestones",
                admin.email,
                created.student.id,
                created.milestone_count
            );
            Ok(created)
        }
        Err(e) => {
            log::error!("Failed to create student: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn delete_student<R>(
    student_id: i32,
    admin: &AuthenticatedAdmin,
    repo: &R,
) -> ServiceResult<()>
where
    R: StudentWriter,
{
    let student_id = StudentId::new(student_id)?;

    match repo.delete_student(student_id) {
        Ok(0) => Err(ServiceError::NotFound),
        Ok(_) => {
            log::info!("Admin {} deleted student {student_id}", admin.email);
            Ok(())
        }
        Err(e) => {
            log::error!("Failed to delete student: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn show_student<R>(student_id: i32, repo: &R) -> ServiceResult<StudentPageDto>
where
    R: StudentReader + StudentMilestoneReader + ActivityReader,
{
    let student_id = StudentId::new(student_id)?;

    let student = match repo.get_student_by_id(student_id) {
        Ok(Some(student)) => student,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load student: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let records = repo.list_student_milestones(student_id).map_err(|e| {
        log::error!("Failed to list student milestones: {e}");
        ServiceError::Internal
    })?;
    let activity = repo
        .list_recent_activity(student_id, RECENT_ACTIVITY_LIMIT)
        .map_err(|e| {
            log::error!("Failed to list activity: {e}");
            ServiceError::Internal
        })?;

    let progress: ProgressSummary = records.iter().map(|r| r.status).collect();
    let groups = CategoryGroupDto::from_groups(group_by_category(&records));

    Ok(StudentPageDto {
        student: StudentDto::new(student, Utc::now().date_naive()),
        groups,
        percent_mastered: progress.percent_mastered(),
        progress,
        activity: activity.into_iter().map(ActivityDto::from).collect(),
    })
}
