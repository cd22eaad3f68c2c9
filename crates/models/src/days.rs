use serde::{Deserialize, Serialize};
use std::{
    convert::Infallible,
    fmt::{Display, Formatter, Result as FmtResult},
    ops::{BitAnd, BitOr, BitOrAssign},
    str::FromStr,
};

/// Represents the weekdays a course meets on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DaySet(u8);

impl DaySet {
    pub const MONDAY: Self = DaySet(1 << 0);
    pub const TUESDAY: Self = DaySet(1 << 1);
    pub const WEDNESDAY: Self = DaySet(1 << 2);
    pub const THURSDAY: Self = DaySet(1 << 3);
    pub const FRIDAY: Self = DaySet(1 << 4);
    pub const SATURDAY: Self = DaySet(1 << 5);
    pub const SUNDAY: Self = DaySet(1 << 6);

    pub const WEEKDAYS: Self = DaySet(0b0011111);
    pub const NONE: Self = DaySet(0);

    /// Day-to-letter mapping. `R` is Thursday so it never collides with `T`
    const DAY_CHARS: [(Self, char); 7] = [
        (Self::MONDAY, 'M'),
        (Self::TUESDAY, 'T'),
        (Self::WEDNESDAY, 'W'),
        (Self::THURSDAY, 'R'),
        (Self::FRIDAY, 'F'),
        (Self::SATURDAY, 'S'),
        (Self::SUNDAY, 'U'),
    ];

    pub fn contains(self, day: Self) -> bool {
        (self & day) == day
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether the two sets share at least one day
    pub fn intersects(self, other: Self) -> bool {
        !(self & other).is_empty()
    }

    /// Number of distinct days in the set
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }
}

impl FromStr for DaySet {
    type Err = Infallible;

    /// Parses day codes such as `"MWF"`, `"T/R"` or `"mw"`.
    ///
    /// Separators and unknown characters are skipped, so the result may be empty.
    fn from_str(days: &str) -> Result<Self, Self::Err> {
        let mut result = Self::NONE;

        for c in days.chars().map(|c| c.to_ascii_uppercase()) {
            if let Some(&(day, _)) = Self::DAY_CHARS.iter().find(|(_, ch)| *ch == c) {
                result |= day;
            }
        }

        Ok(result)
    }
}

impl Display for DaySet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for &(day, day_char) in &Self::DAY_CHARS {
            if self.contains(day) {
                write!(f, "{day_char}")?;
            }
        }

        Ok(())
    }
}

impl BitOr for DaySet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        DaySet(self.0 | rhs.0)
    }
}

impl BitAnd for DaySet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        DaySet(self.0 & rhs.0)
    }
}

impl BitOrAssign for DaySet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
