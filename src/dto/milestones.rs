use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::progress::{CategoryGroup, MilestoneView};
use crate::domain::student_milestone::StudentMilestoneDetail;
use crate::domain::types::{CategoryId, MilestoneStatus};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MilestoneViewDto {
    pub milestone_id: i32,
    pub student_milestone_id: i32,
    pub title: String,
    pub status: MilestoneStatus,
    pub status_label: &'static str,
}

impl From<MilestoneView> for MilestoneViewDto {
    fn from(value: MilestoneView) -> Self {
        Self {
            milestone_id: value.milestone_id.get(),
            student_milestone_id: value.student_milestone_id.get(),
            title: value.title,
            status: value.status,
            status_label: value.status.label(),
        }
    }
}

/// One category section of the student page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryGroupDto {
    pub category_id: i32,
    pub name: String,
    pub icon: String,
    pub mastered: usize,
    pub milestones: Vec<MilestoneViewDto>,
}

impl CategoryGroupDto {
    pub fn from_groups(groups: BTreeMap<CategoryId, CategoryGroup>) -> Vec<Self> {
        groups
            .into_iter()
            .map(|(category_id, group)| Self {
                category_id: category_id.get(),
                mastered: group.count(MilestoneStatus::Mastered),
                name: group.name.into_inner(),
                icon: group.icon.into_inner(),
                milestones: group.milestones.into_iter().map(Into::into).collect(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryRefDto {
    pub id: i32,
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MilestoneRefDto {
    pub id: i32,
    pub description: String,
    pub display_order: i32,
    pub category: CategoryRefDto,
}

/// Joined milestone record as returned by the JSON API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentMilestoneDto {
    pub id: i32,
    pub student_id: i32,
    pub status: MilestoneStatus,
    pub started_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
    pub updated_by: Option<i32>,
    pub milestone: MilestoneRefDto,
}

impl From<StudentMilestoneDetail> for StudentMilestoneDto {
    fn from(value: StudentMilestoneDetail) -> Self {
        Self {
            id: value.id.get(),
            student_id: value.student_id.get(),
            status: value.status,
            started_at: value.started_at,
            completed_at: value.completed_at,
            updated_by: value.updated_by.map(|id| id.get()),
            milestone: MilestoneRefDto {
                id: value.milestone.id.get(),
                description: value.milestone.description.into_inner(),
                display_order: value.milestone.display_order.get(),
                category: CategoryRefDto {
                    id: value.category.id.get(),
                    name: value.category.name.into_inner(),
                    icon: value.category.icon.into_inner(),
                },
            },
        }
    }
}
