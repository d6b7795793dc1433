//! Aggregation of a student's milestones for display.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::student_milestone::StudentMilestoneDetail;
use crate::domain::types::{
    CategoryIcon, CategoryId, CategoryName, DisplayOrder, MilestoneStatus, MilestoneTemplateId,
    StudentMilestoneId,
};

/// View model for one milestone inside a [`CategoryGroup`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MilestoneView {
    pub milestone_id: MilestoneTemplateId,
    pub title: String,
    pub status: MilestoneStatus,
    /// Join-row id used to target status updates.
    pub student_milestone_id: StudentMilestoneId,
    pub display_order: DisplayOrder,
}

/// Milestones of a single category with the category's display metadata.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryGroup {
    pub name: CategoryName,
    pub icon: CategoryIcon,
    pub milestones: Vec<MilestoneView>,
}

impl CategoryGroup {
    /// Number of milestones in this group with the given status.
    pub fn count(&self, status: MilestoneStatus) -> usize {
        self.milestones.iter().filter(|m| m.status == status).count()
    }
}

/// Group joined milestone records by category.
///
/// Buckets are created lazily in a single pass and keyed by category id.
/// Within a bucket milestones are stable-sorted by their declared display
/// order, so records sharing a display order keep their arrival order.
pub fn group_by_category(
    records: &[StudentMilestoneDetail],
) -> BTreeMap<CategoryId, CategoryGroup> {
    let mut groups: BTreeMap<CategoryId, CategoryGroup> = BTreeMap::new();

    for record in records {
        let group = groups
            .entry(record.category.id)
            .or_insert_with(|| CategoryGroup {
                name: record.category.name.clone(),
                icon: record.category.icon.clone(),
                milestones: Vec::new(),
            });

        group.milestones.push(MilestoneView {
            milestone_id: record.milestone.id,
            title: record.milestone.description.as_str().to_string(),
            status: record.status,
            student_milestone_id: record.id,
            display_order: record.milestone.display_order,
        });
    }

    for group in groups.values_mut() {
        group.milestones.sort_by_key(|m| m.display_order);
    }

    groups
}

/// Per-status milestone counts for one student.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ProgressSummary {
    pub total: usize,
    pub not_started: usize,
    pub in_progress: usize,
    pub mastered: usize,
}

impl ProgressSummary {
    /// Count one more milestone with `status`.
    pub fn record(&mut self, status: MilestoneStatus) {
        self.total += 1;
        match status {
            MilestoneStatus::NotStarted => self.not_started += 1,
            MilestoneStatus::InProgress => self.in_progress += 1,
            MilestoneStatus::Mastered => self.mastered += 1,
        }
    }

    /// Share of mastered milestones, rounded down to a whole percent.
    pub fn percent_mastered(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.mastered * 100 / self.total
        }
    }

    /// Add another summary's counts to this one.
    pub fn merge(&mut self, other: &ProgressSummary) {
        self.total += other.total;
        self.not_started += other.not_started;
        self.in_progress += other.in_progress;
        self.mastered += other.mastered;
    }
}

impl FromIterator<MilestoneStatus> for ProgressSummary {
    fn from_iter<I: IntoIterator<Item = MilestoneStatus>>(iter: I) -> Self {
        let mut summary = Self::default();
        for status in iter {
            summary.record(status);
        }
        summary
    }
}
