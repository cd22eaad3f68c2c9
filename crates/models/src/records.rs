use crate::{grade::RevealedGrade, term::Term};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use strum::{AsRefStr, Display as StrumDisplay, EnumString};
use uuid::Uuid;

/// A course offering as listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    /// Course code (e.g., "COSC 2P03")
    pub course_code: String,
    /// Weekday letters (e.g., "MWF", "TR")
    pub course_days: Option<String>,
    /// Time range (e.g., "9:00-10:30", "2:00 PM - 3:30 PM")
    pub class_time: Option<String>,
    /// Duration code (e.g., "D1", "D2", "D3")
    pub course_duration: Option<String>,
    pub instructor: Option<String>,
    /// Delivery type code (e.g., "LEC", "SYN", "ASY")
    pub class_type: Option<String>,
}

/// One slot of a program's required-course list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRequirement {
    pub id: Uuid,
    pub program_id: i32,
    pub year: i32,
    pub course_code: String,
    pub credit_weight: f64,
    pub requirement_type: String,
    pub min_grade: Option<f64>,
}

/// Edge from a course to one of its prerequisites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrerequisiteEdge {
    pub course_code: String,
    pub prerequisite_code: String,
    /// Minimum numeric grade required in the prerequisite, if any
    pub min_grade: Option<f64>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, StrumDisplay, AsRefStr,
)]
pub enum GradeStatus {
    #[strum(serialize = "in-progress")]
    #[serde(rename = "in-progress")]
    InProgress,
    #[strum(serialize = "completed")]
    #[serde(rename = "completed")]
    Completed,
}

/// A stored grade record. `grade` holds ciphertext (or legacy plaintext), never a decrypted value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentGrade {
    pub id: Uuid,
    pub user_id: String,
    pub course_code: String,
    pub requirement_id: Option<Uuid>,
    pub grade: Option<String>,
    pub term: String,
    pub year: i32,
    pub status: GradeStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl StudentGrade {
    /// Whether the record carries a grade value (as opposed to an in-progress marker)
    pub fn has_value(&self) -> bool {
        self.grade.as_deref().is_some_and(|g| !g.trim().is_empty())
    }
}

/// Fields for a grade record that does not exist yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudentGrade {
    pub user_id: String,
    pub course_code: String,
    pub requirement_id: Option<Uuid>,
    pub grade: Option<String>,
    pub term: String,
    pub year: i32,
    pub status: GradeStatus,
}

/// Changes applied to an existing grade record.
///
/// Built only through the constructors so a stored value always implies `Completed`.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeChange {
    grade: Option<String>,
    status: GradeStatus,
}

impl GradeChange {
    /// Stores an (encrypted) grade and marks the course completed
    pub fn completed(encrypted_grade: String) -> Self {
        Self {
            grade: Some(encrypted_grade),
            status: GradeStatus::Completed,
        }
    }

    /// Clears the grade and turns the record into a "currently taking" marker
    pub fn in_progress() -> Self {
        Self {
            grade: None,
            status: GradeStatus::InProgress,
        }
    }

    pub fn grade(&self) -> Option<&str> {
        self.grade.as_deref()
    }

    pub fn status(&self) -> GradeStatus {
        self.status
    }
}

/// A grade record together with its decrypted value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecryptedGrade {
    pub record: StudentGrade,
    pub revealed: RevealedGrade,
}

/// An active enrollment. Dropping a course removes the row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: Uuid,
    pub user_id: String,
    pub course_id: Uuid,
    pub term: Term,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEnrollment {
    pub user_id: String,
    pub course_id: Uuid,
    pub term: Term,
}

/// Status of a co-op work term
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkTermStatus {
    #[default]
    #[serde(rename = "")]
    NotStarted,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl WorkTermStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for WorkTermStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Self::NotStarted),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(format!("Unknown work term status: {other}")),
        }
    }
}

impl Display for WorkTermStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// A co-op work term, tracked outside the credit-counted course model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkTerm {
    pub id: Uuid,
    pub user_id: String,
    /// Display name of the term (e.g., "Work Term 1")
    pub term_name: String,
    pub status: WorkTermStatus,
    pub company_name: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkTerm {
    pub user_id: String,
    pub term_name: String,
    pub status: WorkTermStatus,
    pub company_name: Option<String>,
}

/// Changes applied to an existing work term. `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkTermChange {
    pub status: Option<WorkTermStatus>,
    pub company_name: Option<String>,
}
