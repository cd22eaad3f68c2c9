use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumProperty, EnumString, IntoEnumIterator};

/// An academic term
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    EnumProperty,
)]
#[strum(ascii_case_insensitive)]
pub enum Term {
    #[strum(props(upper = "FALL"))]
    Fall,
    #[strum(props(upper = "WINTER"))]
    Winter,
    #[strum(props(upper = "SPRING"))]
    Spring,
    #[strum(props(upper = "SUMMER"))]
    Summer,
}

impl Term {
    /// Maximum number of enrollments allowed in Spring
    pub const SPRING_COURSE_CAP: usize = 4;
    /// Maximum number of enrollments allowed in any other term
    pub const DEFAULT_COURSE_CAP: usize = 7;

    pub fn all() -> Vec<Term> {
        Term::iter().collect()
    }

    pub fn as_upper_str(&self) -> &'static str {
        self.get_str("upper").unwrap_or_default()
    }

    /// Maximum number of courses a student may be enrolled in for this term
    pub fn max_courses(self) -> usize {
        match self {
            Self::Spring => Self::SPRING_COURSE_CAP,
            _ => Self::DEFAULT_COURSE_CAP,
        }
    }

    /// Registration calendar: Jan-Apr Winter, May-Jun Spring, Jul-Aug Summer, otherwise Fall
    pub fn for_month(month: u32) -> Self {
        match month {
            1..=4 => Self::Winter,
            5..=6 => Self::Spring,
            7..=8 => Self::Summer,
            _ => Self::Fall,
        }
    }

    /// Projection calendar, where May-Aug is a single Spring term
    pub fn academic_for_month(month: u32) -> Self {
        match month {
            1..=4 => Self::Winter,
            5..=8 => Self::Spring,
            _ => Self::Fall,
        }
    }

    /// Convocation season attended after finishing in this term
    pub fn ceremony(self) -> Self {
        match self {
            Self::Fall => Self::Fall,
            Self::Winter | Self::Spring | Self::Summer => Self::Spring,
        }
    }
}

/// The term in effect on a given date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermInfo {
    pub term: Term,
    pub year: i32,
    pub display_name: String,
}

impl TermInfo {
    pub fn for_date(date: NaiveDate) -> Self {
        let term = Term::for_month(date.month());
        let year = date.year();

        Self {
            term,
            year,
            display_name: format!("{} {}", term.as_upper_str(), year),
        }
    }
}

/// How long a course runs
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr, EnumProperty,
)]
#[strum(ascii_case_insensitive)]
pub enum DurationCode {
    #[strum(serialize = "D1", serialize = "1", props(description = "Full Year Course"))]
    FullYear,
    #[strum(serialize = "D2", serialize = "2", props(description = "Fall Term Course"))]
    Fall,
    #[strum(serialize = "D3", serialize = "3", props(description = "Winter Term Course"))]
    Winter,
}

impl DurationCode {
    pub fn description(&self) -> &'static str {
        self.get_str("description").unwrap_or_default()
    }

    /// Parses a stored duration code, returning `None` for anything unrecognised
    pub fn parse(code: &str) -> Option<Self> {
        Self::from_str(code.trim()).ok()
    }
}

/// Which duration codes registration currently accepts, derived from the calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationWindow {
    /// September to December: full-year and fall courses
    Fall,
    /// January to April: winter courses only
    Winter,
    /// May to August: anything goes
    Open,
}

impl RegistrationWindow {
    pub fn for_month(month: u32) -> Self {
        match month {
            9..=12 => Self::Fall,
            1..=4 => Self::Winter,
            _ => Self::Open,
        }
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self::for_month(date.month())
    }

    /// Whether a course with the given duration code may be registered in this window.
    ///
    /// Missing or unknown codes are rejected while a term-restricted window is active.
    pub fn allows(self, duration: Option<&str>) -> bool {
        let code = duration.and_then(DurationCode::parse);

        match self {
            Self::Fall => matches!(code, Some(DurationCode::FullYear | DurationCode::Fall)),
            Self::Winter => matches!(code, Some(DurationCode::Winter)),
            Self::Open => true,
        }
    }

    /// Message shown when a course falls outside this window
    pub fn restriction_message(self) -> &'static str {
        match self {
            Self::Fall => {
                "Currently Fall term (September-December), you can only register for Full Year (D1) or Fall Term (D2) courses."
            }
            Self::Winter => {
                "Currently Winter term (January-April), you can only register for Winter Term (D3) courses."
            }
            Self::Open => "Registration is open for all course durations.",
        }
    }
}

/// Whether a course with `duration` may be registered on `as_of`
pub fn is_duration_eligible(duration: Option<&str>, as_of: NaiveDate) -> bool {
    RegistrationWindow::for_date(as_of).allows(duration)
}

/// Maximum enrollments for `term`
pub fn max_courses_for_term(term: Term) -> usize {
    term.max_courses()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_term_from_str() {
        assert_eq!(Term::from_str("Spring").unwrap(), Term::Spring);
        assert_eq!(Term::from_str("WINTER").unwrap(), Term::Winter);
        assert_eq!(Term::from_str("fall").unwrap(), Term::Fall);
        assert!(Term::from_str("Autumn").is_err());
    }

    #[test]
    fn test_term_display() {
        assert_eq!(Term::Fall.to_string(), "Fall");
        assert_eq!(Term::Summer.as_upper_str(), "SUMMER");
        assert_eq!(Term::all().len(), 4);
    }

    #[test]
    fn test_course_caps() {
        assert_eq!(max_courses_for_term(Term::Spring), 4);
        assert_eq!(max_courses_for_term(Term::Fall), 7);
        assert_eq!(max_courses_for_term(Term::Winter), 7);
        assert_eq!(max_courses_for_term(Term::Summer), 7);
    }

    #[test]
    fn test_term_info_for_date() {
        let info = TermInfo::for_date(date(2025, 2, 14));
        assert_eq!(info.term, Term::Winter);
        assert_eq!(info.display_name, "WINTER 2025");

        assert_eq!(TermInfo::for_date(date(2025, 6, 1)).term, Term::Spring);
        assert_eq!(TermInfo::for_date(date(2025, 7, 1)).term, Term::Summer);
        assert_eq!(TermInfo::for_date(date(2025, 11, 1)).term, Term::Fall);
    }

    #[test]
    fn test_ceremony_mapping() {
        assert_eq!(Term::Winter.ceremony(), Term::Spring);
        assert_eq!(Term::Spring.ceremony(), Term::Spring);
        assert_eq!(Term::Fall.ceremony(), Term::Fall);
    }

    #[test]
    fn test_duration_code_parse() {
        assert_eq!(DurationCode::parse("D1"), Some(DurationCode::FullYear));
        assert_eq!(DurationCode::parse("d2"), Some(DurationCode::Fall));
        assert_eq!(DurationCode::parse(" 3 "), Some(DurationCode::Winter));
        assert_eq!(DurationCode::parse("D9"), None);
        assert_eq!(DurationCode::Winter.description(), "Winter Term Course");
    }

    #[test]
    fn test_fall_window() {
        let october = date(2025, 10, 1);
        assert!(!is_duration_eligible(Some("D3"), october));
        assert!(is_duration_eligible(Some("D1"), october));
        assert!(is_duration_eligible(Some("D2"), october));
        assert!(!is_duration_eligible(None, october));
    }

    #[test]
    fn test_winter_window() {
        let february = date(2026, 2, 1);
        assert!(is_duration_eligible(Some("D3"), february));
        assert!(is_duration_eligible(Some("3"), february));
        assert!(!is_duration_eligible(Some("D1"), february));
        assert!(!is_duration_eligible(Some("D2"), february));
    }

    #[test]
    fn test_open_window() {
        let june = date(2025, 6, 15);
        for code in [Some("D1"), Some("D2"), Some("D3"), Some("X"), None] {
            assert!(is_duration_eligible(code, june));
        }
    }
}
