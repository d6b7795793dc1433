//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and status enums are enforced at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use validator::{ValidateEmail, ValidateUrl};

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be non-negative was negative.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// URL validation failed.
    #[error("{0} must be a valid URL")]
    InvalidUrl(&'static str),
    /// Email validation failed.
    #[error("{0} must be a valid email address")]
    InvalidEmail(&'static str),
    /// Phone number validation failed.
    #[error("{0} must be a valid phone number")]
    InvalidPhone(&'static str),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }
    };
}

/// Shared accessors and conversions for string-backed newtypes.
macro_rules! string_newtype_impls {
    ($name:ident) => {
        impl $name {
            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }
        }

        string_newtype_impls!($name);
    };
}

macro_rules! url_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed URL and validates its format.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = trim_and_require_non_empty(value, $field)?;
                if !trimmed.as_str().validate_url() {
                    return Err(TypeConstraintError::InvalidUrl($field));
                }
                Ok(Self(trimmed))
            }
        }

        string_newtype_impls!($name);
    };
}

macro_rules! email_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, lowercased email address and validates its format.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = trim_and_require_non_empty(value, $field)?.to_lowercase();
                if !trimmed.as_str().validate_email() {
                    return Err(TypeConstraintError::InvalidEmail($field));
                }
                Ok(Self(trimmed))
            }
        }

        string_newtype_impls!($name);
    };
}

id_newtype!(AdminId, "Unique identifier for an admin.", "admin_id");
id_newtype!(
    CategoryId,
    "Unique identifier for a milestone category.",
    "category_id"
);
id_newtype!(
    MilestoneTemplateId,
    "Unique identifier for a milestone template.",
    "milestone_template_id"
);
id_newtype!(StudentId, "Unique identifier for a student.", "student_id");
id_newtype!(
    StudentMilestoneId,
    "Unique identifier for a student milestone row.",
    "student_milestone_id"
);
id_newtype!(
    ActivityId,
    "Unique identifier for an activity log entry.",
    "activity_id"
);

non_empty_string_newtype!(
    CategoryName,
    "Category display name enforcing non-empty values.",
    "category name"
);
non_empty_string_newtype!(
    CategoryIcon,
    "Category display icon enforcing non-empty values.",
    "category icon"
);
non_empty_string_newtype!(
    MilestoneDescription,
    "Milestone template description enforcing non-empty values.",
    "milestone description"
);
non_empty_string_newtype!(
    StudentName,
    "Student full name enforcing non-empty values.",
    "full name"
);
non_empty_string_newtype!(
    GuardianName,
    "Parent or guardian name enforcing non-empty values.",
    "parent name"
);
non_empty_string_newtype!(
    ActivityDescription,
    "Activity log description enforcing non-empty values.",
    "activity description"
);

url_string_newtype!(AvatarUrl, "Student avatar URL.", "avatar url");

email_string_newtype!(AdminEmail, "Admin login email.", "admin email");
email_string_newtype!(GuardianEmail, "Parent or guardian email.", "parent email");

/// Parent or guardian phone number.
///
/// Only digits, spaces and `-+()` are allowed and at least ten digits must be
/// present.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct GuardianPhone(String);

impl GuardianPhone {
    /// Constructs a trimmed phone number and validates its shape.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = trim_and_require_non_empty(value, "parent phone")?;
        let allowed = trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '+' | '(' | ')'));
        let digits = trimmed.chars().filter(char::is_ascii_digit).count();
        if !allowed || digits < 10 {
            return Err(TypeConstraintError::InvalidPhone("parent phone"));
        }
        Ok(Self(trimmed))
    }
}

string_newtype_impls!(GuardianPhone);

/// Position of a category or template within its listing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DisplayOrder(i32);

impl DisplayOrder {
    /// Constructs a value that must be zero or greater.
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if value >= 0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeNumber("display order"))
        }
    }

    /// Returns the raw `i32` value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for DisplayOrder {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Progress state of a single student milestone.
///
/// The states form a fixed cycle: not-started → in-progress → mastered and
/// back to not-started.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MilestoneStatus {
    #[default]
    NotStarted,
    InProgress,
    Mastered,
}

impl MilestoneStatus {
    /// All statuses in cycle order.
    pub const CYCLE: [MilestoneStatus; 3] = [Self::NotStarted, Self::InProgress, Self::Mastered];

    /// String representation used in persistence and over the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Mastered => "mastered",
        }
    }

    /// Human readable label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Mastered => "Mastered",
        }
    }

    /// The next status in the cycle.
    pub const fn next(self) -> Self {
        match self {
            Self::NotStarted => Self::InProgress,
            Self::InProgress => Self::Mastered,
            Self::Mastered => Self::NotStarted,
        }
    }
}

impl Display for MilestoneStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for MilestoneStatus {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "not-started" => Ok(Self::NotStarted),
            "in-progress" => Ok(Self::InProgress),
            "mastered" => Ok(Self::Mastered),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "milestone status: {other}"
            ))),
        }
    }
}

impl TryFrom<String> for MilestoneStatus {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<MilestoneStatus> for String {
    fn from(value: MilestoneStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Lifecycle state of a student profile.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
}

impl StudentStatus {
    /// String representation used in persistence.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl Display for StudentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for StudentStatus {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "student status: {other}"
            ))),
        }
    }
}

/// Kind of event recorded in the activity log.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    StudentCreated,
    MilestoneUpdated,
}

impl ActivityKind {
    /// String representation used in persistence.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StudentCreated => "student_created",
            Self::MilestoneUpdated => "milestone_updated",
        }
    }
}

impl Display for ActivityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for ActivityKind {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "student_created" => Ok(Self::StudentCreated),
            "milestone_updated" => Ok(Self::MilestoneUpdated),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "activity kind: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_non_empty_strings() {
        let value = StudentName::new("  Emma Johnson  ").unwrap();
        assert_eq!(value.as_str(), "Emma Johnson");
    }

    #[test]
    fn rejects_non_positive_ids() {
        let err = StudentId::new(0).unwrap_err();
        assert_eq!(err, TypeConstraintError::NonPositiveId("student_id"));
    }

    #[test]
    fn validates_urls() {
        assert!(AvatarUrl::new("https://example.com/a.png").is_ok());
        let err = AvatarUrl::new("not-a-url").unwrap_err();
        assert_eq!(err, TypeConstraintError::InvalidUrl("avatar url"));
    }

    #[test]
    fn lowercases_emails() {
        let email = AdminEmail::new(" Admin@School.COM ").unwrap();
        assert_eq!(email.as_str(), "admin@school.com");
        assert!(GuardianEmail::new("nope").is_err());
    }

    #[test]
    fn validates_phone_numbers() {
        assert!(GuardianPhone::new("+1 (555) 123-4567").is_ok());
        assert_eq!(
            GuardianPhone::new("555-1234").unwrap_err(),
            TypeConstraintError::InvalidPhone("parent phone")
        );
        assert!(GuardianPhone::new("555 123 4567 ext").is_err());
    }

    #[test]
    fn status_cycles_back_after_three_steps() {
        for status in MilestoneStatus::CYCLE {
            assert_eq!(status.next().next().next(), status);
            assert_ne!(status.next(), status);
        }
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in MilestoneStatus::CYCLE {
            assert_eq!(MilestoneStatus::try_from(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = MilestoneStatus::try_from("done").unwrap_err();
        assert!(matches!(err, TypeConstraintError::InvalidValue(_)));
    }

    #[test]
    fn status_serializes_kebab_case() {
        let value = serde_json::to_value(MilestoneStatus::InProgress).unwrap();
        assert_eq!(value, serde_json::json!("in-progress"));
    }

    #[test]
    fn display_order_rejects_negative_numbers() {
        assert_eq!(
            DisplayOrder::new(-1).unwrap_err(),
            TypeConstraintError::NegativeNumber("display order")
        );
    }
}
