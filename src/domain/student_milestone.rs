use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::category::{Category, MilestoneTemplate};
use crate::domain::types::{
    AdminId, MilestoneStatus, MilestoneTemplateId, StudentId, StudentMilestoneId,
};

/// Status of a milestone together with its derived timestamps.
///
/// `completed_at` is present iff the status is [`MilestoneStatus::Mastered`].
/// `started_at` is stamped the first time the milestone leaves
/// [`MilestoneStatus::NotStarted`] and is never cleared.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MilestoneProgress {
    pub status: MilestoneStatus,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

impl MilestoneProgress {
    /// Advance to the next status in the cycle.
    pub fn advance(self, now: NaiveDateTime) -> Self {
        self.transition_to(self.status.next(), now)
    }

    /// Move to `status`, deriving the timestamps from the transition.
    ///
    /// Staying on the current status leaves the timestamps untouched.
    pub fn transition_to(self, status: MilestoneStatus, now: NaiveDateTime) -> Self {
        if status == self.status {
            return self;
        }

        let started_at = match (self.started_at, status) {
            (Some(started_at), _) => Some(started_at),
            (None, MilestoneStatus::NotStarted) => None,
            (None, _) => Some(now),
        };
        let completed_at = match status {
            MilestoneStatus::Mastered => Some(now),
            _ => None,
        };

        Self {
            status,
            started_at,
            completed_at,
        }
    }
}

/// Per-student instance tracking one milestone template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentMilestone {
    pub id: StudentMilestoneId,
    pub student_id: StudentId,
    pub milestone_template_id: MilestoneTemplateId,
    pub status: MilestoneStatus,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub updated_by: Option<AdminId>,
    pub updated_at: NaiveDateTime,
}

impl StudentMilestone {
    /// Current status and timestamps.
    pub fn progress(&self) -> MilestoneProgress {
        MilestoneProgress {
            status: self.status,
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

/// A student milestone joined with its template and the template's category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentMilestoneDetail {
    pub id: StudentMilestoneId,
    pub student_id: StudentId,
    pub status: MilestoneStatus,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub updated_by: Option<AdminId>,
    pub milestone: MilestoneTemplate,
    pub category: Category,
}

/// Where a status write should leave a milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTarget {
    /// The status after the current one in the cycle.
    Next,
    Exactly(MilestoneStatus),
}

impl StatusTarget {
    /// Resolve the target against the row's current progress.
    pub fn apply(self, current: MilestoneProgress, now: NaiveDateTime) -> MilestoneProgress {
        match self {
            Self::Next => current.advance(now),
            Self::Exactly(status) => current.transition_to(status, now),
        }
    }
}

/// Status write targeting a single student milestone row.
///
/// The resulting timestamps are derived from the row as stored at write time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MilestoneUpdate {
    pub id: StudentMilestoneId,
    pub target: StatusTarget,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn at(secs: i64) -> NaiveDateTime {
        DateTime::from_timestamp(secs, 0).unwrap().naive_utc()
    }

    #[test]
    fn entering_in_progress_stamps_start() {
        let progress = MilestoneProgress::default().advance(at(10));

        assert_eq!(progress.status, MilestoneStatus::InProgress);
        assert_eq!(progress.started_at, Some(at(10)));
        assert_eq!(progress.completed_at, None);
    }

    #[test]
    fn mastering_sets_completion_and_leaving_clears_it() {
        let mastered = MilestoneProgress::default().advance(at(10)).advance(at(20));
        assert_eq!(mastered.status, MilestoneStatus::Mastered);
        assert_eq!(mastered.completed_at, Some(at(20)));

        let reset = mastered.advance(at(30));
        assert_eq!(reset.status, MilestoneStatus::NotStarted);
        assert_eq!(reset.completed_at, None);
    }

    #[test]
    fn start_is_never_overwritten() {
        let first = MilestoneProgress::default().advance(at(10));
        let again = first.advance(at(20)).advance(at(30)).advance(at(40));

        assert_eq!(again.status, MilestoneStatus::InProgress);
        assert_eq!(again.started_at, Some(at(10)));
    }

    #[test]
    fn three_advances_return_to_starting_status() {
        for status in MilestoneStatus::CYCLE {
            let start = MilestoneProgress {
                status,
                ..MilestoneProgress::default()
            };
            let end = start.advance(at(1)).advance(at(2)).advance(at(3));
            assert_eq!(end.status, status);
        }
    }

    #[test]
    fn jumping_straight_to_mastered_also_stamps_start() {
        let progress =
            MilestoneProgress::default().transition_to(MilestoneStatus::Mastered, at(5));

        assert_eq!(progress.started_at, Some(at(5)));
        assert_eq!(progress.completed_at, Some(at(5)));
    }

    #[test]
    fn staying_on_mastered_keeps_completion_time() {
        let mastered =
            MilestoneProgress::default().transition_to(MilestoneStatus::Mastered, at(5));
        let same = mastered.transition_to(MilestoneStatus::Mastered, at(50));

        assert_eq!(same, mastered);
    }

    #[test]
    fn target_resolves_against_current_progress() {
        let started = MilestoneProgress::default().advance(at(10));

        let mastered = StatusTarget::Exactly(MilestoneStatus::Mastered).apply(started, at(20));
        assert_eq!(mastered.started_at, Some(at(10)));
        assert_eq!(mastered.completed_at, Some(at(20)));

        let next = StatusTarget::Next.apply(started, at(30));
        assert_eq!(next.status, MilestoneStatus::Mastered);
        assert_eq!(next.started_at, Some(at(10)));
    }
}
