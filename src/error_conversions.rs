//! Conversions from form and value-object errors into [`ServiceError`].

use crate::domain::types::TypeConstraintError;
use crate::forms::milestones::UpdateMilestonesFormError;
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<UpdateMilestonesFormError> for ServiceError {
    fn from(val: UpdateMilestonesFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
