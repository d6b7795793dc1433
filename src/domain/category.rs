use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryIcon, CategoryId, CategoryName, DisplayOrder, MilestoneDescription,
    MilestoneTemplateId,
};

/// Developmental domain grouping related milestone templates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub icon: CategoryIcon,
    pub description: Option<String>,
    pub display_order: DisplayOrder,
}

/// Reusable definition of a developmental checkpoint, independent of any student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MilestoneTemplate {
    pub id: MilestoneTemplateId,
    pub category_id: CategoryId,
    pub description: MilestoneDescription,
    pub display_order: DisplayOrder,
    pub is_active: bool,
}
