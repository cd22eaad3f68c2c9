//! Narrow, typed persistence contracts, one per table.
//!
//! Every read and write that touches user-owned rows takes the user id and filters on it.
//! The only exceptions are [`GradeRepository::grade_owner`] and
//! [`GradeRepository::delete_grade_by_id`], used by the delete fallback chain after the
//! owner has been verified.

mod course;
mod enrollment;
mod grade;
mod prerequisite;
mod requirement;
mod work_term;

#[cfg(test)]
pub(crate) mod memory;

pub use course::CourseRepository;
pub use enrollment::EnrollmentRepository;
pub use grade::GradeRepository;
pub use prerequisite::PrerequisiteRepository;
pub use requirement::RequirementRepository;
pub use work_term::WorkTermRepository;

use log::error;
use models::error::EngineError;
use sea_orm::DbErr;

/// Store failures reach the caller as their message text
pub(crate) fn persistence(err: DbErr) -> EngineError {
    error!("Database error: {}", err);
    EngineError::Persistence(err.to_string())
}
