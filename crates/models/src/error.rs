use crate::{records::Course, term::Term};
use thiserror::Error;

/// Why a prerequisite check rejected a grade
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrerequisiteError {
    #[error(
        "Missing prerequisite: {prerequisite} must be completed before adding a grade for {course}"
    )]
    Missing { course: String, prerequisite: String },

    #[error("Grade requirement not met: {prerequisite} requires a minimum grade of {min_grade}")]
    GradeNotMet {
        course: String,
        prerequisite: String,
        min_grade: f64,
    },
}

impl PrerequisiteError {
    /// Code of the prerequisite course that blocked the request
    pub fn prerequisite(&self) -> &str {
        match self {
            Self::Missing { prerequisite, .. } | Self::GradeNotMet { prerequisite, .. } => {
                prerequisite
            }
        }
    }
}

/// Every expected failure an engine operation can report
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("User not authenticated")]
    Unauthenticated,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Prerequisite(#[from] PrerequisiteError),

    /// Recoverable: the caller may repeat the request with the override confirmed
    #[error("Schedule conflict with {}", course_codes(.conflicts))]
    ScheduleConflict { conflicts: Vec<Course> },

    #[error("You've reached the maximum limit of {limit} courses for {term} term.")]
    CapacityReached { term: Term, limit: usize },

    #[error("{0}")]
    DurationIneligible(String),

    #[error("You are already enrolled in this course.")]
    AlreadyEnrolled,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Grade encryption failed: {0}")]
    Cipher(String),

    /// Store failure, message passed through verbatim
    #[error("{0}")]
    Persistence(String),
}

impl EngineError {
    /// Whether the request can be retried with an explicit user override
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::ScheduleConflict { .. })
    }
}

fn course_codes(courses: &[Course]) -> String {
    courses
        .iter()
        .map(|course| course.course_code.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rejects requests that arrive without an authenticated user
pub fn require_user(user_id: &str) -> Result<&str, EngineError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        Err(EngineError::Unauthenticated)
    } else {
        Ok(user_id)
    }
}
