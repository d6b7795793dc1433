use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{MilestoneStatus, StudentMilestoneId, TypeConstraintError};

/// One entry of a bulk status update.
///
/// Clients may also send `started_at`/`completed_at`; those are derived from
/// the transition on the server and therefore not read.
#[derive(Deserialize, Serialize, Validate)]
pub struct MilestoneStatusEntry {
    #[validate(range(min = 1))]
    pub id: i32,
    pub status: String,
}

#[derive(Deserialize, Validate)]
pub struct UpdateMilestonesForm {
    #[validate(length(min = 1), nested)]
    pub milestones: Vec<MilestoneStatusEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneStatusChange {
    pub id: StudentMilestoneId,
    pub status: MilestoneStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateMilestonesFormPayload {
    pub changes: Vec<MilestoneStatusChange>,
}

#[derive(Debug, Error)]
pub enum UpdateMilestonesFormError {
    #[error("Milestone update validation failed: {0}")]
    Validation(String),
    #[error("Milestone update contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Milestone {0} appears more than once")]
    Duplicate(i32),
}

impl From<ValidationErrors> for UpdateMilestonesFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UpdateMilestonesFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<UpdateMilestonesForm> for UpdateMilestonesFormPayload {
    type Error = UpdateMilestonesFormError;

    fn try_from(value: UpdateMilestonesForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let mut seen = HashSet::new();
        let mut changes = Vec::with_capacity(value.milestones.len());
        for entry in value.milestones {
            if !seen.insert(entry.id) {
                return Err(UpdateMilestonesFormError::Duplicate(entry.id));
            }
            changes.push(MilestoneStatusChange {
                id: StudentMilestoneId::new(entry.id)?,
                status: MilestoneStatus::try_from(entry.status.as_str())?,
            });
        }

        Ok(Self { changes })
    }
}
