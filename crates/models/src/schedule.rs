use crate::{days::DaySet, records::Course};
use chrono::{NaiveTime, Timelike};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;

lazy_static! {
    /// `start-end`, each side `H`, `HH`, `H:MM` or `HH:MM` with an optional AM/PM suffix
    static ref TIME_RANGE: Regex = Regex::new(
        r"(?i)(\d{1,2})(?::(\d{2}))?\s*(AM|PM)?\s*[-–—]\s*(\d{1,2})(?::(\d{2}))?\s*(AM|PM)?"
    )
    .unwrap();
}

/// Represents the daily time range a course meets in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub begin: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    /// Creates a new `TimeRange` if `begin` is before `end`
    pub fn new(begin: NaiveTime, end: NaiveTime) -> Option<Self> {
        (begin < end).then_some(Self { begin, end })
    }

    /// Parses strings like `"9:00-10:30"`, `"2:00 PM - 3:30 PM"` or `"14-16"`.
    ///
    /// # Returns
    /// `None` when no range is found, a side is not a valid clock time, or the range is reversed
    pub fn parse(time: &str) -> Option<Self> {
        let caps = TIME_RANGE.captures(time)?;

        let begin = clock_time(&caps, 1, 2, 3)?;
        let end = clock_time(&caps, 4, 5, 6)?;

        Self::new(begin, end)
    }

    pub fn start_minute(&self) -> u32 {
        self.begin.num_seconds_from_midnight() / 60
    }

    pub fn end_minute(&self) -> u32 {
        self.end.num_seconds_from_midnight() / 60
    }

    /// Inclusive overlap, so back-to-back ranges sharing an endpoint overlap
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_minute() <= other.end_minute() && self.end_minute() >= other.start_minute()
    }
}

/// Builds a clock time from the hour, minute and meridiem capture groups
fn clock_time(caps: &Captures<'_>, hour: usize, minute: usize, meridiem: usize) -> Option<NaiveTime> {
    let mut hour: u32 = caps.get(hour)?.as_str().parse().ok()?;
    let minute: u32 = caps
        .get(minute)
        .map_or(Some(0), |m| m.as_str().parse().ok())?;

    let meridiem = caps.get(meridiem).map(|m| m.as_str().to_ascii_uppercase());
    match meridiem.as_deref() {
        Some("PM") if hour < 12 => hour += 12,
        Some("AM") if hour == 12 => hour = 0,
        _ => {}
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// When a course meets during the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeetingPattern {
    pub days: DaySet,
    pub time: TimeRange,
}

impl MeetingPattern {
    /// Reads a course's schedule fields.
    ///
    /// # Returns
    /// `None` if either field is missing, no weekday letters are present, or the time is unparseable
    pub fn of(course: &Course) -> Option<Self> {
        let days: DaySet = course.course_days.as_deref()?.parse().ok()?;
        if days.is_empty() {
            return None;
        }

        let time = TimeRange::parse(course.class_time.as_deref()?)?;

        Some(Self { days, time })
    }

    pub fn clashes_with(&self, other: &Self) -> bool {
        self.days.intersects(other.days) && self.time.overlaps(&other.time)
    }
}

/// Whether two courses meet on a shared weekday at overlapping times.
///
/// Courses with missing or unreadable schedule information never conflict.
pub fn has_conflict(a: &Course, b: &Course) -> bool {
    match (MeetingPattern::of(a), MeetingPattern::of(b)) {
        (Some(a), Some(b)) => a.clashes_with(&b),
        _ => false,
    }
}

/// Every course in `enrolled` that conflicts with `candidate`
pub fn find_conflicts<'a>(candidate: &Course, enrolled: &'a [Course]) -> Vec<&'a Course> {
    let Some(pattern) = MeetingPattern::of(candidate) else {
        return Vec::new();
    };

    enrolled
        .iter()
        .filter(|course| MeetingPattern::of(course).is_some_and(|other| pattern.clashes_with(&other)))
        .collect()
}
