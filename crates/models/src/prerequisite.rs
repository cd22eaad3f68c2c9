use crate::{
    error::PrerequisiteError,
    grade::RevealedGrade,
    records::{DecryptedGrade, GradeStatus, PrerequisiteEdge},
};
use log::debug;
use std::collections::HashMap;

/// Revealed values of a student's completed records, keyed by course code
pub type CompletedGrades = HashMap<String, Vec<RevealedGrade>>;

/// Collects the completed records out of a student's decrypted grades
pub fn completed_grades<'a, I>(grades: I) -> CompletedGrades
where
    I: IntoIterator<Item = &'a DecryptedGrade>,
{
    let mut completed = CompletedGrades::new();
    for grade in grades {
        if grade.record.status == GradeStatus::Completed {
            completed
                .entry(grade.record.course_code.clone())
                .or_default()
                .push(grade.revealed.clone());
        }
    }
    completed
}

/// Whether any of the revealed values meets `min_grade`.
///
/// Letter grades are coerced through the midpoint table. Decryption errors, empty and
/// unrecognised values never satisfy a minimum.
fn meets_minimum(grades: &[RevealedGrade], min_grade: f64) -> bool {
    grades
        .iter()
        .filter_map(|grade| grade.classify()?.as_numeric())
        .any(|value| value >= min_grade)
}

/// Checks every prerequisite of `course_code` against the student's completed courses.
///
/// # Arguments
/// * `course_code` - The course a grade is about to be created for
/// * `edges` - Prerequisite edges; edges for other courses are ignored
/// * `completed` - The student's completed records, see [`completed_grades`]
///
/// # Returns
/// The first unmet prerequisite, in edge order
pub fn check(
    course_code: &str,
    edges: &[PrerequisiteEdge],
    completed: &CompletedGrades,
) -> Result<(), PrerequisiteError> {
    for edge in edges.iter().filter(|edge| edge.course_code == course_code) {
        let grades = completed
            .get(&edge.prerequisite_code)
            .map(Vec::as_slice)
            .unwrap_or_default();

        if grades.is_empty() {
            debug!(
                "{} is missing prerequisite {}",
                course_code, edge.prerequisite_code
            );
            return Err(PrerequisiteError::Missing {
                course: course_code.to_string(),
                prerequisite: edge.prerequisite_code.clone(),
            });
        }

        if let Some(min_grade) = edge.min_grade
            && !meets_minimum(grades, min_grade)
        {
            debug!(
                "{} requires {} >= {}",
                course_code, edge.prerequisite_code, min_grade
            );
            return Err(PrerequisiteError::GradeNotMet {
                course: course_code.to_string(),
                prerequisite: edge.prerequisite_code.clone(),
                min_grade,
            });
        }
    }

    Ok(())
}
