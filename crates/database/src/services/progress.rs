use crate::{
    repositories::{GradeRepository, RequirementRepository},
    services::grade::reveal_records,
};
use chrono::NaiveDate;
use cipher::GradeCipher;
use futures::try_join;
use log::info;
use models::{
    error::{EngineError, require_user},
    gpa::{GradeSummary, is_good_academic_standing},
    graduation::GraduationProjection,
    progress::ProgressSummary,
    term::TermInfo,
};
use serde::Serialize;
use std::sync::Arc;

/// Everything the academic progress page shows at once
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub progress: ProgressSummary,
    pub grades: GradeSummary,
    pub projection: GraduationProjection,
    pub term: TermInfo,
    pub good_standing: bool,
}

pub struct ProgressService<R> {
    repo: Arc<R>,
    cipher: Arc<GradeCipher>,
}

impl<R> ProgressService<R>
where
    R: GradeRepository + RequirementRepository,
{
    pub fn new(repo: Arc<R>, cipher: Arc<GradeCipher>) -> Self {
        Self { repo, cipher }
    }

    /// Degree progress, grade figures and projected graduation for a student.
    ///
    /// # Arguments
    /// * `user_id` - The authenticated user
    /// * `program_id` - The student's program; without one every completed record uses the
    ///   default passing grade
    /// * `total_required` - Program size; `0` uses the default
    /// * `as_of` - Date the current term and projection are computed from
    pub async fn dashboard(
        &self,
        user_id: &str,
        program_id: Option<i32>,
        total_required: u32,
        as_of: NaiveDate,
    ) -> Result<Dashboard, EngineError> {
        let user_id = require_user(user_id)?;

        let requirements = async {
            match program_id {
                Some(program_id) => self.repo.requirements_for_program(program_id).await,
                None => Ok(Vec::new()),
            }
        };
        let (records, requirements) =
            try_join!(self.repo.grades_for_user(user_id), requirements)?;

        let grades = reveal_records(&self.cipher, user_id, records);
        let progress = ProgressSummary::compute(&grades, &requirements, total_required);
        let summary = GradeSummary::compute(&grades);

        info!(
            "Progress for user {}: {}/{} complete, {} in progress",
            user_id, progress.completed, progress.total_required, progress.in_progress
        );

        Ok(Dashboard {
            projection: progress.projection(as_of),
            term: TermInfo::for_date(as_of),
            good_standing: is_good_academic_standing(summary.overall_gpa),
            progress,
            grades: summary,
        })
    }
}
