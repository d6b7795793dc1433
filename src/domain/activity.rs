use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ActivityDescription, ActivityId, ActivityKind, AdminId, StudentId};

/// Audit trail entry attached to a student.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub id: ActivityId,
    pub student_id: StudentId,
    pub admin_id: AdminId,
    pub kind: ActivityKind,
    pub description: ActivityDescription,
    pub created_at: NaiveDateTime,
}
