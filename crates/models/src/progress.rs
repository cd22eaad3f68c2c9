use crate::{
    graduation::GraduationProjection,
    records::{DecryptedGrade, GradeStatus, ProgramRequirement},
};
use chrono::NaiveDate;
use serde::Serialize;

/// Program size assumed when the program does not specify one
pub const DEFAULT_TOTAL_COURSES: u32 = 40;

/// Passing grade assumed when a requirement has no minimum
pub const DEFAULT_PASSING_GRADE: f64 = 50.0;

/// Degree progress counted from a student's grade records
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total_required: u32,
    pub completed: u32,
    pub in_progress: u32,
    pub remaining: u32,
    pub percent_complete: f64,
    pub percent_in_progress: f64,
}

impl ProgressSummary {
    /// Counts completed and in-progress courses.
    ///
    /// A completed record only counts when its grade reaches the minimum of the matching
    /// requirement (or [`DEFAULT_PASSING_GRADE`]). Unreadable grades never count as completed.
    ///
    /// # Arguments
    /// * `grades` - The student's decrypted grade records
    /// * `requirements` - The program's requirement slots
    /// * `total_required` - Program size; `0` falls back to [`DEFAULT_TOTAL_COURSES`]
    pub fn compute(
        grades: &[DecryptedGrade],
        requirements: &[ProgramRequirement],
        total_required: u32,
    ) -> Self {
        let total_required = if total_required == 0 {
            DEFAULT_TOTAL_COURSES
        } else {
            total_required
        };

        let mut completed = 0;
        let mut in_progress = 0;

        for grade in grades {
            match grade.record.status {
                GradeStatus::Completed => {
                    let min_grade = requirements
                        .iter()
                        .find(|req| req.course_code == grade.record.course_code)
                        .and_then(|req| req.min_grade)
                        .filter(|min| *min > 0.0)
                        .unwrap_or(DEFAULT_PASSING_GRADE);

                    let numeric = grade
                        .revealed
                        .classify()
                        .and_then(|value| value.as_numeric())
                        .unwrap_or(0.0);

                    if numeric >= min_grade {
                        completed += 1;
                    }
                }
                GradeStatus::InProgress => in_progress += 1,
            }
        }

        let percent_complete = percentage(completed, total_required).min(100.0);
        let percent_in_progress =
            percentage(in_progress, total_required).min(100.0 - percent_complete);

        Self {
            total_required,
            completed,
            in_progress,
            remaining: total_required.saturating_sub(completed + in_progress),
            percent_complete,
            percent_in_progress,
        }
    }

    /// Completed plus in-progress courses
    pub fn effective_completed(&self) -> u32 {
        self.completed + self.in_progress
    }

    pub fn projection(&self, as_of: NaiveDate) -> GraduationProjection {
        GraduationProjection::for_date(self.total_required, self.effective_completed(), as_of)
    }
}

fn percentage(count: u32, total: u32) -> f64 {
    (count as f64 / total as f64 * 100.0).round()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{grade::RevealedGrade, records::StudentGrade, term::Term};
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    fn grade(code: &str, revealed: RevealedGrade, status: GradeStatus) -> DecryptedGrade {
        DecryptedGrade {
            record: StudentGrade {
                id: Uuid::new_v4(),
                user_id: "user-1".to_string(),
                course_code: code.to_string(),
                requirement_id: None,
                grade: None,
                term: "Fall".to_string(),
                year: 2025,
                status,
                created_at: NaiveDateTime::default(),
                updated_at: NaiveDateTime::default(),
            },
            revealed,
        }
    }

    fn requirement(code: &str, min_grade: Option<f64>) -> ProgramRequirement {
        ProgramRequirement {
            id: Uuid::new_v4(),
            program_id: 1,
            year: 1,
            course_code: code.to_string(),
            credit_weight: 0.5,
            requirement_type: "required".to_string(),
            min_grade,
        }
    }

    fn value(v: &str) -> RevealedGrade {
        RevealedGrade::Value(v.to_string())
    }

    #[test]
    fn test_counts_against_requirement_minimums() {
        let requirements = vec![requirement("COSC 1P02", Some(60.0)), requirement("MATH 1P66", None)];
        let grades = vec![
            grade("COSC 1P02", value("55"), GradeStatus::Completed),
            grade("MATH 1P66", value("55"), GradeStatus::Completed),
            grade("COSC 1P03", value("B"), GradeStatus::Completed),
            grade("ECON 1P91", value("F"), GradeStatus::Completed),
            grade("COSC 1P50", RevealedGrade::Error, GradeStatus::Completed),
            grade("COSC 1P71", RevealedGrade::Empty, GradeStatus::InProgress),
        ];

        let summary = ProgressSummary::compute(&grades, &requirements, 20);

        assert_eq!(summary.completed, 2);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.remaining, 17);
        assert_eq!(summary.percent_complete, 10.0);
        assert_eq!(summary.percent_in_progress, 5.0);
    }

    #[test]
    fn test_zero_total_uses_default() {
        let summary = ProgressSummary::compute(&[], &[], 0);
        assert_eq!(summary.total_required, DEFAULT_TOTAL_COURSES);
        assert_eq!(summary.remaining, DEFAULT_TOTAL_COURSES);
        assert_eq!(summary.percent_complete, 0.0);
    }

    #[test]
    fn test_percentages_are_capped() {
        let grades: Vec<_> = (0..5)
            .map(|i| grade(&format!("COSC {i}P01"), value("90"), GradeStatus::Completed))
            .chain((0..3).map(|i| grade(&format!("MATH {i}P01"), RevealedGrade::Empty, GradeStatus::InProgress)))
            .collect();

        let summary = ProgressSummary::compute(&grades, &[], 4);
        assert_eq!(summary.percent_complete, 100.0);
        assert_eq!(summary.percent_in_progress, 0.0);
        assert_eq!(summary.remaining, 0);
    }

    #[test]
    fn test_projection_uses_effective_completed() {
        let grades: Vec<_> = (0..30)
            .map(|i| grade(&format!("COSC {i}"), value("70"), GradeStatus::Completed))
            .chain((0..6).map(|i| grade(&format!("MATH {i}"), RevealedGrade::Empty, GradeStatus::InProgress)))
            .collect();

        let summary = ProgressSummary::compute(&grades, &[], 40);
        let october = NaiveDate::from_ymd_opt(2025, 10, 1).unwrap();
        let projection = summary.projection(october);

        assert_eq!(projection.remaining, 4);
        assert_eq!((projection.term, projection.year), (Term::Winter, 2026));
    }
}
