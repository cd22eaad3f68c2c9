use crate::error::EngineError;
use serde::{Serialize, Serializer};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// A letter grade on the percentage scale
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, EnumIter, AsRefStr,
)]
pub enum LetterGrade {
    #[strum(serialize = "A+")]
    APlus,
    #[strum(serialize = "A")]
    A,
    #[strum(serialize = "A-")]
    AMinus,
    #[strum(serialize = "B+")]
    BPlus,
    #[strum(serialize = "B")]
    B,
    #[strum(serialize = "B-")]
    BMinus,
    #[strum(serialize = "C+")]
    CPlus,
    #[strum(serialize = "C")]
    C,
    #[strum(serialize = "C-")]
    CMinus,
    #[strum(serialize = "D+")]
    DPlus,
    #[strum(serialize = "D")]
    D,
    #[strum(serialize = "D-")]
    DMinus,
    #[strum(serialize = "F")]
    F,
}

impl LetterGrade {
    /// Lower bound (inclusive) of each letter's percentage bucket, highest first
    const THRESHOLDS: [(f64, Self); 12] = [
        (90.0, Self::APlus),
        (85.0, Self::A),
        (80.0, Self::AMinus),
        (77.0, Self::BPlus),
        (73.0, Self::B),
        (70.0, Self::BMinus),
        (67.0, Self::CPlus),
        (63.0, Self::C),
        (60.0, Self::CMinus),
        (57.0, Self::DPlus),
        (53.0, Self::D),
        (50.0, Self::DMinus),
    ];

    /// Buckets a percentage into a letter grade
    pub fn from_numeric(value: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(lower, _)| value >= *lower)
            .map(|&(_, letter)| letter)
            .unwrap_or(Self::F)
    }

    /// Value on the 4.0 scale
    pub fn grade_points(self) -> f64 {
        match self {
            Self::APlus | Self::A => 4.0,
            Self::AMinus => 3.7,
            Self::BPlus => 3.3,
            Self::B => 3.0,
            Self::BMinus => 2.7,
            Self::CPlus => 2.3,
            Self::C => 2.0,
            Self::CMinus => 1.7,
            Self::DPlus => 1.3,
            Self::D => 1.0,
            Self::DMinus => 0.7,
            Self::F => 0.0,
        }
    }

    /// Percentage used when a letter grade has to be averaged with numeric grades
    pub fn midpoint(self) -> f64 {
        match self {
            Self::APlus => 95.0,
            Self::A => 87.5,
            Self::AMinus => 82.5,
            Self::BPlus => 77.5,
            Self::B => 75.0,
            Self::BMinus => 72.5,
            Self::CPlus => 67.5,
            Self::C => 65.0,
            Self::CMinus => 62.5,
            Self::DPlus => 57.5,
            Self::D => 55.0,
            Self::DMinus => 52.5,
            Self::F => 45.0,
        }
    }

    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

impl Display for LetterGrade {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_ref())
    }
}

impl Serialize for LetterGrade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_ref())
    }
}

/// Converts a percentage into its letter grade
pub fn numeric_to_letter(value: f64) -> LetterGrade {
    LetterGrade::from_numeric(value)
}

/// A decrypted grade value, classified
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradeValue {
    Numeric(f64),
    Letter(LetterGrade),
    /// Neither a number nor a letter grade; skipped by every aggregate
    Unrecognized,
}

impl GradeValue {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if let Ok(value) = trimmed.parse::<f64>()
            && value.is_finite()
        {
            return Self::Numeric(value);
        }

        LetterGrade::from_str(&trimmed.to_ascii_uppercase())
            .map(Self::Letter)
            .unwrap_or(Self::Unrecognized)
    }

    /// Percentage value, using the letter midpoint table for letter grades
    pub fn as_numeric(self) -> Option<f64> {
        match self {
            Self::Numeric(value) => Some(value),
            Self::Letter(letter) => Some(letter.midpoint()),
            Self::Unrecognized => None,
        }
    }

    /// Letter grade, bucketing numeric values
    pub fn letter(self) -> Option<LetterGrade> {
        match self {
            Self::Numeric(value) => Some(LetterGrade::from_numeric(value)),
            Self::Letter(letter) => Some(letter),
            Self::Unrecognized => None,
        }
    }
}

/// Outcome of decrypting a stored grade. Reading a grade never fails outright
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealedGrade {
    Value(String),
    /// No value stored (an in-progress marker)
    Empty,
    /// The stored value could not be decrypted
    Error,
}

impl RevealedGrade {
    pub const ERROR_SENTINEL: &'static str = "Decryption Error";
    pub const EMPTY_SENTINEL: &'static str = "N/A";

    /// The decrypted text, when there is a usable one
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Value(value) if !value.trim().is_empty() => Some(value),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    pub fn classify(&self) -> Option<GradeValue> {
        self.value().map(GradeValue::parse)
    }
}

impl Display for RevealedGrade {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::Empty => write!(f, "{}", Self::EMPTY_SENTINEL),
            Self::Error => write!(f, "{}", Self::ERROR_SENTINEL),
        }
    }
}

impl Serialize for RevealedGrade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Checks a grade submitted for storage.
///
/// Any non-empty text is accepted, but numeric grades must lie within 0-100.
pub fn validate_grade_input(raw: &str) -> Result<(), EngineError> {
    if raw.trim().is_empty() {
        return Err(EngineError::Validation("Grade cannot be empty".to_string()));
    }

    match GradeValue::parse(raw) {
        GradeValue::Numeric(value) if value > 100.0 => Err(EngineError::Validation(
            "Grade cannot exceed 100. Please enter a valid grade.".to_string(),
        )),
        GradeValue::Numeric(value) if value < 0.0 => Err(EngineError::Validation(
            "Grade cannot be negative. Please enter a valid grade.".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_from_str() {
        assert_eq!(LetterGrade::from_str("A+").unwrap(), LetterGrade::APlus);
        assert_eq!(LetterGrade::from_str("D-").unwrap(), LetterGrade::DMinus);
        assert!(LetterGrade::from_str("E").is_err());
        assert_eq!(LetterGrade::all().len(), 13);
    }

    #[test]
    fn test_numeric_to_letter_thresholds() {
        assert_eq!(numeric_to_letter(100.0), LetterGrade::APlus);
        assert_eq!(numeric_to_letter(90.0), LetterGrade::APlus);
        assert_eq!(numeric_to_letter(89.9), LetterGrade::A);
        assert_eq!(numeric_to_letter(77.0), LetterGrade::BPlus);
        assert_eq!(numeric_to_letter(76.9), LetterGrade::B);
        assert_eq!(numeric_to_letter(60.0), LetterGrade::CMinus);
        assert_eq!(numeric_to_letter(50.0), LetterGrade::DMinus);
        assert_eq!(numeric_to_letter(49.99), LetterGrade::F);
        assert_eq!(numeric_to_letter(0.0), LetterGrade::F);
    }

    #[test]
    fn test_midpoints_fall_in_their_own_bucket() {
        for letter in LetterGrade::all() {
            assert_eq!(LetterGrade::from_numeric(letter.midpoint()), letter);
        }
    }

    #[test]
    fn test_grade_value_parse() {
        assert_eq!(GradeValue::parse("85"), GradeValue::Numeric(85.0));
        assert_eq!(GradeValue::parse(" 72.5 "), GradeValue::Numeric(72.5));
        assert_eq!(GradeValue::parse("b+"), GradeValue::Letter(LetterGrade::BPlus));
        assert_eq!(GradeValue::parse("pass"), GradeValue::Unrecognized);
        assert_eq!(GradeValue::parse("NaN"), GradeValue::Unrecognized);
    }

    #[test]
    fn test_grade_value_conversions() {
        assert_eq!(GradeValue::parse("B").as_numeric(), Some(75.0));
        assert_eq!(GradeValue::parse("81").letter(), Some(LetterGrade::AMinus));
        assert_eq!(GradeValue::Unrecognized.as_numeric(), None);
        assert_eq!(GradeValue::Unrecognized.letter(), None);
    }

    #[test]
    fn test_revealed_grade_display() {
        assert_eq!(RevealedGrade::Value("A".to_string()).to_string(), "A");
        assert_eq!(RevealedGrade::Empty.to_string(), "N/A");
        assert_eq!(RevealedGrade::Error.to_string(), "Decryption Error");
        assert_eq!(RevealedGrade::Value("  ".to_string()).value(), None);
        assert!(RevealedGrade::Error.classify().is_none());
    }

    #[test]
    fn test_validate_grade_input() {
        assert!(validate_grade_input("100").is_ok());
        assert!(validate_grade_input("A-").is_ok());
        assert!(validate_grade_input("0").is_ok());
        assert!(matches!(
            validate_grade_input("101"),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            validate_grade_input("-5"),
            Err(EngineError::Validation(_))
        ));
        assert!(matches!(
            validate_grade_input("   "),
            Err(EngineError::Validation(_))
        ));
    }
}
