pub mod days;
pub mod error;
pub mod gpa;
pub mod grade;
pub mod graduation;
pub mod prerequisite;
pub mod progress;
pub mod records;
pub mod response;
pub mod schedule;
pub mod term;
