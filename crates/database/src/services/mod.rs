pub mod enrollment;
pub mod grade;
pub mod locks;
pub mod progress;
pub mod work_term;
