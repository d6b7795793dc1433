use diesel::prelude::*;

use crate::domain::category::{Category as DomainCategory, MilestoneTemplate as DomainTemplate};
use crate::domain::types::{
    CategoryIcon, CategoryName, DisplayOrder, MilestoneDescription, TypeConstraintError,
};

/// Diesel model representing the `milestone_categories` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::milestone_categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub icon: String,
    pub description: Option<String>,
    pub display_order: i32,
}

/// Diesel model representing the `milestone_templates` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(belongs_to(Category))]
#[diesel(table_name = crate::schema::milestone_templates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MilestoneTemplate {
    pub id: i32,
    pub category_id: i32,
    pub description: String,
    pub display_order: i32,
    pub is_active: bool,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: category.id.try_into()?,
            name: CategoryName::new(category.name)?,
            icon: CategoryIcon::new(category.icon)?,
            description: category.description,
            display_order: DisplayOrder::new(category.display_order)?,
        })
    }
}

impl TryFrom<MilestoneTemplate> for DomainTemplate {
    type Error = TypeConstraintError;

    fn try_from(template: MilestoneTemplate) -> Result<Self, Self::Error> {
        Ok(Self {
            id: template.id.try_into()?,
            category_id: template.category_id.try_into()?,
            description: MilestoneDescription::new(template.description)?,
            display_order: DisplayOrder::new(template.display_order)?,
            is_active: template.is_active,
        })
    }
}
