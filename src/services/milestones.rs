use chrono::Utc;

use crate::domain::admin::AuthenticatedAdmin;
use crate::domain::student_milestone::{MilestoneUpdate, StatusTarget, StudentMilestone};
use crate::domain::types::{MilestoneStatus, StudentId, StudentMilestoneId};
use crate::dto::milestones::StudentMilestoneDto;
use crate::forms::milestones::UpdateMilestonesFormPayload;
use crate::repository::{
    RepositoryError, StudentMilestoneReader, StudentMilestoneWriter, StudentReader,
};

use super::{ServiceError, ServiceResult};

fn ensure_student_exists<R>(student_id: StudentId, repo: &R) -> ServiceResult<()>
where
    R: StudentReader,
{
    match repo.get_student_by_id(student_id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to load student: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn persist_updates<R>(
    student_id: StudentId,
    updates: &[MilestoneUpdate],
    admin: &AuthenticatedAdmin,
    repo: &R,
) -> ServiceResult<Vec<StudentMilestone>>
where
    R: StudentMilestoneWriter,
{
    if updates.is_empty() {
        return Ok(Vec::new());
    }

    let now = Utc::now().naive_utc();
    match repo.update_student_milestones(student_id, updates, admin.id, now) {
        Ok(changed) => Ok(changed),
        Err(RepositoryError::NotFound) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to update student milestones: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Joined milestone records of a student in display order.
pub fn list_student_milestones<R>(
    student_id: i32,
    repo: &R,
) -> ServiceResult<Vec<StudentMilestoneDto>>
where
    R: StudentReader + StudentMilestoneReader,
{
    let student_id = StudentId::new(student_id)?;
    ensure_student_exists(student_id, repo)?;

    match repo.list_student_milestones(student_id) {
        Ok(records) => Ok(records.into_iter().map(StudentMilestoneDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list student milestones: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Advance one milestone to the next status in the cycle and persist it.
///
/// Returns the new status.
pub fn toggle_milestone<R>(
    student_id: i32,
    student_milestone_id: i32,
    admin: &AuthenticatedAdmin,
    repo: &R,
) -> ServiceResult<MilestoneStatus>
where
    R: StudentMilestoneWriter,
{
    let student_id = StudentId::new(student_id)?;
    let update = MilestoneUpdate {
        id: StudentMilestoneId::new(student_milestone_id)?,
        target: StatusTarget::Next,
    };

    let changed = persist_updates(student_id, &[update], admin, repo)?;
    match changed.first() {
        Some(row) => Ok(row.status),
        None => {
            log::error!("Toggle of student milestone {student_milestone_id} wrote nothing");
            Err(ServiceError::Internal)
        }
    }
}

/// Apply a batch of status changes to one student's milestones.
///
/// Timestamps are derived from each row's stored state. Rows already in the
/// requested status are left alone. Returns the number of rows written.
pub fn update_milestones<R>(
    student_id: i32,
    payload: UpdateMilestonesFormPayload,
    admin: &AuthenticatedAdmin,
    repo: &R,
) -> ServiceResult<usize>
where
    R: StudentReader + StudentMilestoneWriter,
{
    let student_id = StudentId::new(student_id)?;
    ensure_student_exists(student_id, repo)?;

    let updates: Vec<MilestoneUpdate> = payload
        .changes
        .into_iter()
        .map(|change| MilestoneUpdate {
            id: change.id,
            target: StatusTarget::Exactly(change.status),
        })
        .collect();

    Ok(persist_updates(student_id, &updates, admin, repo)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ActivityKind;
    use crate::forms::milestones::MilestoneStatusChange;
    use crate::repository::StudentWriter;
    use crate::repository::test::TestRepository;
    use crate::services::students::fixtures::{admin, at, new_student, repo, student};

    fn seeded() -> (TestRepository, i32) {
        let repo = repo().with_students(vec![student(1, "Emma")]);
        let created = repo
            .create_student_with_milestones(&new_student("Noah"))
            .unwrap();
        (repo, created.student.id.get())
    }

    fn change(id: i32, status: MilestoneStatus) -> MilestoneStatusChange {
        MilestoneStatusChange {
            id: StudentMilestoneId::new(id).unwrap(),
            status,
        }
    }

    #[test]
    fn toggling_three_times_returns_to_not_started() {
        let (repo, student_id) = seeded();
        let row_id = repo.milestones()[0].id.get();

        let statuses: Vec<MilestoneStatus> = (0..3)
            .map(|_| toggle_milestone(student_id, row_id, &admin(), &repo).unwrap())
            .collect();

        assert_eq!(
            statuses,
            vec![
                MilestoneStatus::InProgress,
                MilestoneStatus::Mastered,
                MilestoneStatus::NotStarted
            ]
        );
        let row = &repo.milestones()[0];
        assert_eq!(row.status, MilestoneStatus::NotStarted);
        assert!(row.completed_at.is_none());
        assert!(row.started_at.is_some());
        assert_eq!(row.updated_by, Some(admin().id));
    }

    #[test]
    fn toggle_rejects_row_of_another_student() {
        let (repo, _) = seeded();
        let row_id = repo.milestones()[0].id.get();

        assert_eq!(
            toggle_milestone(1, row_id, &admin(), &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }

    #[test]
    fn bulk_update_derives_timestamps_and_skips_unchanged_rows() {
        let (repo, student_id) = seeded();
        let rows = repo.milestones();
        let payload = UpdateMilestonesFormPayload {
            changes: vec![
                change(rows[0].id.get(), MilestoneStatus::Mastered),
                change(rows[1].id.get(), MilestoneStatus::NotStarted),
            ],
        };

        let updated = update_milestones(student_id, payload, &admin(), &repo).unwrap();

        assert_eq!(updated, 1);
        let rows = repo.milestones();
        assert_eq!(rows[0].status, MilestoneStatus::Mastered);
        assert!(rows[0].started_at.is_some());
        assert!(rows[0].completed_at.is_some());
        assert_eq!(rows[1].status, MilestoneStatus::NotStarted);
    }

    #[test]
    fn bulk_update_keeps_start_stamped_by_an_earlier_write() {
        let (repo, student_id) = seeded();
        let row = repo.milestones()[0].clone();
        repo.update_student_milestones(
            row.student_id,
            &[MilestoneUpdate {
                id: row.id,
                target: StatusTarget::Exactly(MilestoneStatus::InProgress),
            }],
            admin().id,
            at(100),
        )
        .unwrap();

        let payload = UpdateMilestonesFormPayload {
            changes: vec![change(row.id.get(), MilestoneStatus::Mastered)],
        };
        update_milestones(student_id, payload, &admin(), &repo).unwrap();

        let stored = &repo.milestones()[0];
        assert_eq!(stored.status, MilestoneStatus::Mastered);
        assert_eq!(stored.started_at, Some(at(100)));
        assert!(stored.completed_at.is_some_and(|t| t > at(100)));
    }

    #[test]
    fn bulk_update_records_activity_for_changed_rows() {
        let (repo, student_id) = seeded();
        let rows = repo.milestones();
        let payload = UpdateMilestonesFormPayload {
            changes: vec![
                change(rows[0].id.get(), MilestoneStatus::Mastered),
                change(rows[1].id.get(), MilestoneStatus::NotStarted),
            ],
        };

        update_milestones(student_id, payload, &admin(), &repo).unwrap();

        let activity = repo.activity();
        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].kind, ActivityKind::MilestoneUpdated);
        assert_eq!(activity[0].admin_id, admin().id);
        assert_eq!(
            activity[0].description.as_str(),
            "\"Milestone 1\" marked Mastered"
        );
        assert_eq!(repo.milestones()[0].updated_at, activity[0].created_at);
    }

    #[test]
    fn bulk_update_unknown_row_changes_nothing() {
        let (repo, student_id) = seeded();
        let first = repo.milestones()[0].id.get();
        let payload = UpdateMilestonesFormPayload {
            changes: vec![
                change(first, MilestoneStatus::Mastered),
                change(999, MilestoneStatus::Mastered),
            ],
        };

        assert_eq!(
            update_milestones(student_id, payload, &admin(), &repo).unwrap_err(),
            ServiceError::NotFound
        );
        assert!(
            repo.milestones()
                .iter()
                .all(|r| r.status == MilestoneStatus::NotStarted)
        );
        assert!(repo.activity().is_empty());
    }

    #[test]
    fn bulk_update_unknown_student_is_not_found() {
        let payload = UpdateMilestonesFormPayload {
            changes: vec![change(1, MilestoneStatus::Mastered)],
        };

        assert_eq!(
            update_milestones(77, payload, &admin(), &repo()).unwrap_err(),
            ServiceError::NotFound
        );
    }

    #[test]
    fn lists_joined_records_for_existing_student() {
        let (repo, student_id) = seeded();

        let records = list_student_milestones(student_id, &repo).unwrap();

        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.student_id == student_id));
        assert_eq!(
            list_student_milestones(55, &repo).unwrap_err(),
            ServiceError::NotFound
        );
    }

    #[test]
    fn persistence_failure_is_internal() {
        let (repo, student_id) = seeded();
        let row_id = repo.milestones()[0].id.get();
        let repo = repo.failing_writes();

        assert_eq!(
            toggle_milestone(student_id, row_id, &admin(), &repo).unwrap_err(),
            ServiceError::Internal
        );
    }
}
