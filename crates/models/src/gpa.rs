use crate::{
    grade::{GradeValue, LetterGrade},
    records::{DecryptedGrade, GradeStatus},
};
use serde::Serialize;
use std::collections::BTreeMap;

/// GPA at or above which a student is in good academic standing
pub const GOOD_STANDING_GPA: f64 = 2.0;

/// Numeric grades above this are capped before averaging
pub const MAX_NUMERIC_GRADE: f64 = 100.0;

/// Averages grade points on the 4.0 scale, rounded to two decimals.
///
/// # Returns
/// `0.0` for an empty input
pub fn calculate_gpa<I>(letters: I) -> f64
where
    I: IntoIterator<Item = LetterGrade>,
{
    let (total, count) = letters
        .into_iter()
        .fold((0.0, 0usize), |(total, count), letter| {
            (total + letter.grade_points(), count + 1)
        });

    if count == 0 {
        0.0
    } else {
        round_to(total / count as f64, 2)
    }
}

/// Percentage average over numeric and letter grades.
///
/// Numeric grades are capped at 100 and used as-is; letter grades contribute their midpoint;
/// unrecognised values are skipped. Returns `0.0` when nothing is averageable.
pub fn numeric_average<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a GradeValue>,
{
    let (total, count) = values
        .into_iter()
        .filter_map(|value| match value {
            GradeValue::Numeric(n) => Some(n.min(MAX_NUMERIC_GRADE)),
            other => other.as_numeric(),
        })
        .fold((0.0, 0usize), |(total, count), n| (total + n, count + 1));

    if count == 0 { 0.0 } else { total / count as f64 }
}

pub fn is_good_academic_standing(gpa: f64) -> bool {
    gpa >= GOOD_STANDING_GPA
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// GPA for one term of one year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermGpa {
    pub year: i32,
    pub term: String,
    pub gpa: f64,
}

/// Aggregate figures over a student's decrypted grades
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeSummary {
    pub overall_gpa: f64,
    pub numeric_average: f64,
    pub term_gpas: Vec<TermGpa>,
    pub year_gpas: BTreeMap<i32, f64>,
    /// Records that contributed to the figures
    pub counted: usize,
    /// Records skipped because they could not be decrypted
    pub unreadable: usize,
}

impl GradeSummary {
    /// Only completed records with a successfully decrypted value are counted
    pub fn compute(grades: &[DecryptedGrade]) -> Self {
        let mut letters = Vec::new();
        let mut values = Vec::new();
        let mut by_term: BTreeMap<(i32, String), Vec<LetterGrade>> = BTreeMap::new();
        let mut by_year: BTreeMap<i32, Vec<LetterGrade>> = BTreeMap::new();
        let mut unreadable = 0;

        for grade in grades {
            if grade.record.status != GradeStatus::Completed {
                continue;
            }
            if grade.revealed.is_error() {
                unreadable += 1;
                continue;
            }
            let Some(value) = grade.revealed.classify() else {
                continue;
            };
            if value == GradeValue::Unrecognized {
                continue;
            }

            values.push(value);

            if let Some(letter) = value.letter() {
                letters.push(letter);
                by_term
                    .entry((grade.record.year, grade.record.term.clone()))
                    .or_default()
                    .push(letter);
                by_year.entry(grade.record.year).or_default().push(letter);
            }
        }

        Self {
            overall_gpa: calculate_gpa(letters),
            numeric_average: numeric_average(&values),
            term_gpas: by_term
                .into_iter()
                .map(|((year, term), letters)| TermGpa {
                    year,
                    term,
                    gpa: calculate_gpa(letters),
                })
                .collect(),
            year_gpas: by_year
                .into_iter()
                .map(|(year, letters)| (year, calculate_gpa(letters)))
                .collect(),
            counted: values.len(),
            unreadable,
        }
    }
}
