pub mod course_prerequisites;
pub mod courses;
pub mod enrollments;
pub mod program_requirements;
pub mod student_grades;
pub mod work_terms;
