use crate::term::Term;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Standard course load per term
pub const COURSES_PER_TERM: u32 = 5;

/// When a student is projected to finish, and which convocation they attend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraduationProjection {
    pub term: Term,
    pub year: i32,
    pub ceremony_term: Term,
    pub ceremony_year: i32,
    pub remaining: u32,
}

impl GraduationProjection {
    /// Projects the completion term from the student's remaining load.
    ///
    /// # Arguments
    /// * `total_required` - Courses the program requires
    /// * `effective_completed` - Completed plus in-progress courses
    /// * `current` - The academic term in effect (Summer is treated as Spring)
    /// * `year` - The current calendar year
    pub fn project(total_required: u32, effective_completed: u32, current: Term, year: i32) -> Self {
        let remaining = total_required.saturating_sub(effective_completed);

        let (term, year) = if remaining <= COURSES_PER_TERM {
            next_term(current, year)
        } else {
            let terms_needed = remaining.div_ceil(COURSES_PER_TERM);

            // Spring doesn't carry load, so start counting from the coming Fall
            let mut position = match current {
                Term::Spring | Term::Summer => (Term::Fall, year),
                other => (other, year),
            };
            for _ in 0..terms_needed {
                position = next_load_bearing(position.0, position.1);
            }
            position
        };

        Self {
            term,
            year,
            ceremony_term: term.ceremony(),
            ceremony_year: year,
            remaining,
        }
    }

    /// Same as [`project`](Self::project), reading the term off the academic calendar for `as_of`
    pub fn for_date(total_required: u32, effective_completed: u32, as_of: NaiveDate) -> Self {
        Self::project(
            total_required,
            effective_completed,
            Term::academic_for_month(as_of.month()),
            as_of.year(),
        )
    }
}

/// The immediately following academic term
fn next_term(current: Term, year: i32) -> (Term, i32) {
    match current {
        Term::Fall => (Term::Winter, year + 1),
        Term::Winter => (Term::Spring, year),
        Term::Spring | Term::Summer => (Term::Fall, year),
    }
}

/// The next Fall or Winter term
fn next_load_bearing(current: Term, year: i32) -> (Term, i32) {
    match current {
        Term::Fall => (Term::Winter, year + 1),
        Term::Winter | Term::Spring | Term::Summer => (Term::Fall, year),
    }
}
