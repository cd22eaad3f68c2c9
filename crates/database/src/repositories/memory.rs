//! In-memory store used by the service tests

use super::{
    CourseRepository, EnrollmentRepository, GradeRepository, PrerequisiteRepository,
    RequirementRepository, WorkTermRepository,
};
use async_trait::async_trait;
use chrono::Utc;
use models::{
    error::EngineError,
    records::{
        Course, Enrollment, GradeChange, NewEnrollment, NewStudentGrade, NewWorkTerm,
        PrerequisiteEdge, ProgramRequirement, StudentGrade, WorkTerm, WorkTermChange,
    },
    term::Term,
};
use std::{
    cmp::Reverse,
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
};
use uuid::Uuid;

#[derive(Default)]
struct State {
    courses: Vec<Course>,
    requirements: Vec<ProgramRequirement>,
    edges: Vec<PrerequisiteEdge>,
    grades: Vec<StudentGrade>,
    enrollments: Vec<Enrollment>,
    work_terms: Vec<WorkTerm>,
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    state: Mutex<State>,
    /// Scoped grade deletes report success without removing anything
    pub(crate) scoped_delete_noop: AtomicBool,
    /// Unscoped grade deletes fail with a store error
    pub(crate) fail_unscoped_delete: AtomicBool,
    /// Every grade read fails with a store error
    pub(crate) fail_grade_reads: AtomicBool,
}

impl MemoryStore {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn flag(flag: &AtomicBool) -> bool {
        flag.load(Ordering::SeqCst)
    }

    fn check_reads(&self) -> Result<(), EngineError> {
        if Self::flag(&self.fail_grade_reads) {
            return Err(EngineError::Persistence("connection refused".to_string()));
        }
        Ok(())
    }

    pub(crate) fn add_course(&self, code: &str, days: &str, time: &str, duration: &str) -> Course {
        let course = Course {
            id: Uuid::new_v4(),
            course_code: code.to_string(),
            course_days: Some(days.to_string()),
            class_time: Some(time.to_string()),
            course_duration: Some(duration.to_string()),
            instructor: None,
            class_type: Some("LEC".to_string()),
        };
        self.state().courses.push(course.clone());
        course
    }

    pub(crate) fn add_prerequisite(&self, course: &str, prerequisite: &str, min_grade: Option<f64>) {
        self.state().edges.push(PrerequisiteEdge {
            course_code: course.to_string(),
            prerequisite_code: prerequisite.to_string(),
            min_grade,
        });
    }

    pub(crate) fn add_requirement(&self, program_id: i32, code: &str, min_grade: Option<f64>) -> Uuid {
        let id = Uuid::new_v4();
        self.state().requirements.push(ProgramRequirement {
            id,
            program_id,
            year: 1,
            course_code: code.to_string(),
            credit_weight: 0.5,
            requirement_type: "required".to_string(),
            min_grade,
        });
        id
    }

    /// Inserts a record as-is, bypassing the services
    pub(crate) fn seed_grade(&self, grade: NewStudentGrade) -> StudentGrade {
        let now = Utc::now().naive_utc();
        let record = StudentGrade {
            id: Uuid::new_v4(),
            user_id: grade.user_id,
            course_code: grade.course_code,
            requirement_id: grade.requirement_id,
            grade: grade.grade,
            term: grade.term,
            year: grade.year,
            status: grade.status,
            created_at: now,
            updated_at: now,
        };
        self.state().grades.push(record.clone());
        record
    }

    pub(crate) fn grades(&self) -> Vec<StudentGrade> {
        self.state().grades.clone()
    }

    pub(crate) fn enrollments(&self) -> Vec<Enrollment> {
        self.state().enrollments.clone()
    }

    pub(crate) fn work_terms(&self) -> Vec<WorkTerm> {
        self.state().work_terms.clone()
    }
}

#[async_trait]
impl CourseRepository for MemoryStore {
    async fn find_course(&self, course_id: Uuid) -> Result<Option<Course>, EngineError> {
        Ok(self.state().courses.iter().find(|c| c.id == course_id).cloned())
    }

    async fn courses_by_ids(&self, course_ids: &[Uuid]) -> Result<Vec<Course>, EngineError> {
        Ok(self
            .state()
            .courses
            .iter()
            .filter(|c| course_ids.contains(&c.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RequirementRepository for MemoryStore {
    async fn requirements_for_program(
        &self,
        program_id: i32,
    ) -> Result<Vec<ProgramRequirement>, EngineError> {
        Ok(self
            .state()
            .requirements
            .iter()
            .filter(|r| r.program_id == program_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PrerequisiteRepository for MemoryStore {
    async fn prerequisites_for(
        &self,
        course_code: &str,
    ) -> Result<Vec<PrerequisiteEdge>, EngineError> {
        Ok(self
            .state()
            .edges
            .iter()
            .filter(|e| e.course_code == course_code)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl GradeRepository for MemoryStore {
    async fn grades_for_user(&self, user_id: &str) -> Result<Vec<StudentGrade>, EngineError> {
        self.check_reads()?;
        let mut grades: Vec<_> = self
            .state()
            .grades
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect();
        grades.sort_by_key(|g| Reverse(g.year));
        Ok(grades)
    }

    async fn grades_for_course(
        &self,
        user_id: &str,
        course_code: &str,
    ) -> Result<Vec<StudentGrade>, EngineError> {
        self.check_reads()?;
        Ok(self
            .state()
            .grades
            .iter()
            .filter(|g| g.user_id == user_id && g.course_code == course_code)
            .cloned()
            .collect())
    }

    async fn find_grade(
        &self,
        user_id: &str,
        grade_id: Uuid,
    ) -> Result<Option<StudentGrade>, EngineError> {
        self.check_reads()?;
        Ok(self
            .state()
            .grades
            .iter()
            .find(|g| g.id == grade_id && g.user_id == user_id)
            .cloned())
    }

    async fn insert_grade(&self, grade: NewStudentGrade) -> Result<StudentGrade, EngineError> {
        Ok(self.seed_grade(grade))
    }

    async fn update_grade(
        &self,
        user_id: &str,
        grade_id: Uuid,
        change: GradeChange,
    ) -> Result<Option<StudentGrade>, EngineError> {
        let mut state = self.state();
        let Some(grade) = state
            .grades
            .iter_mut()
            .find(|g| g.id == grade_id && g.user_id == user_id)
        else {
            return Ok(None);
        };

        grade.grade = change.grade().map(str::to_string);
        grade.status = change.status();
        grade.updated_at = Utc::now().naive_utc();

        Ok(Some(grade.clone()))
    }

    async fn delete_grade(&self, user_id: &str, grade_id: Uuid) -> Result<u64, EngineError> {
        if Self::flag(&self.scoped_delete_noop) {
            return Ok(0);
        }
        let mut state = self.state();
        let before = state.grades.len();
        state
            .grades
            .retain(|g| !(g.id == grade_id && g.user_id == user_id));
        Ok((before - state.grades.len()) as u64)
    }

    async fn grade_owner(&self, grade_id: Uuid) -> Result<Option<String>, EngineError> {
        self.check_reads()?;
        Ok(self
            .state()
            .grades
            .iter()
            .find(|g| g.id == grade_id)
            .map(|g| g.user_id.clone()))
    }

    async fn delete_grade_by_id(&self, grade_id: Uuid) -> Result<u64, EngineError> {
        if Self::flag(&self.fail_unscoped_delete) {
            return Err(EngineError::Persistence(
                "permission denied for table student_grades".to_string(),
            ));
        }
        let mut state = self.state();
        let before = state.grades.len();
        state.grades.retain(|g| g.id != grade_id);
        Ok((before - state.grades.len()) as u64)
    }

    async fn delete_grades_for_user(&self, user_id: &str) -> Result<u64, EngineError> {
        let mut state = self.state();
        let before = state.grades.len();
        state.grades.retain(|g| g.user_id != user_id);
        Ok((before - state.grades.len()) as u64)
    }
}

#[async_trait]
impl EnrollmentRepository for MemoryStore {
    async fn enrollments_for_user(
        &self,
        user_id: &str,
        term: Option<Term>,
    ) -> Result<Vec<Enrollment>, EngineError> {
        Ok(self
            .state()
            .enrollments
            .iter()
            .filter(|e| e.user_id == user_id && term.is_none_or(|term| e.term == term))
            .cloned()
            .collect())
    }

    async fn count_enrollments(&self, user_id: &str, term: Term) -> Result<u64, EngineError> {
        Ok(self.enrollments_for_user(user_id, Some(term)).await?.len() as u64)
    }

    async fn insert_enrollment(
        &self,
        enrollment: NewEnrollment,
    ) -> Result<Enrollment, EngineError> {
        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            user_id: enrollment.user_id,
            course_id: enrollment.course_id,
            term: enrollment.term,
            created_at: Utc::now().naive_utc(),
        };
        self.state().enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn delete_enrollment(
        &self,
        user_id: &str,
        course_id: Uuid,
        term: Term,
    ) -> Result<u64, EngineError> {
        let mut state = self.state();
        let before = state.enrollments.len();
        state
            .enrollments
            .retain(|e| !(e.user_id == user_id && e.course_id == course_id && e.term == term));
        Ok((before - state.enrollments.len()) as u64)
    }
}

#[async_trait]
impl WorkTermRepository for MemoryStore {
    async fn work_terms_for_user(&self, user_id: &str) -> Result<Vec<WorkTerm>, EngineError> {
        Ok(self
            .state()
            .work_terms
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_work_term(
        &self,
        user_id: &str,
        work_term_id: Uuid,
    ) -> Result<Option<WorkTerm>, EngineError> {
        Ok(self
            .state()
            .work_terms
            .iter()
            .find(|w| w.id == work_term_id && w.user_id == user_id)
            .cloned())
    }

    async fn find_work_term_by_name(
        &self,
        user_id: &str,
        term_name: &str,
    ) -> Result<Option<WorkTerm>, EngineError> {
        Ok(self
            .state()
            .work_terms
            .iter()
            .find(|w| w.term_name == term_name && w.user_id == user_id)
            .cloned())
    }

    async fn insert_work_term(&self, work_term: NewWorkTerm) -> Result<WorkTerm, EngineError> {
        let work_term = WorkTerm {
            id: Uuid::new_v4(),
            user_id: work_term.user_id,
            term_name: work_term.term_name,
            status: work_term.status,
            company_name: work_term.company_name,
            created_at: Utc::now().naive_utc(),
        };
        self.state().work_terms.push(work_term.clone());
        Ok(work_term)
    }

    async fn update_work_term(
        &self,
        user_id: &str,
        work_term_id: Uuid,
        change: WorkTermChange,
    ) -> Result<Option<WorkTerm>, EngineError> {
        let mut state = self.state();
        let Some(work_term) = state
            .work_terms
            .iter_mut()
            .find(|w| w.id == work_term_id && w.user_id == user_id)
        else {
            return Ok(None);
        };

        if let Some(status) = change.status {
            work_term.status = status;
        }
        if let Some(company_name) = change.company_name {
            work_term.company_name = Some(company_name);
        }

        Ok(Some(work_term.clone()))
    }

    async fn delete_work_term(
        &self,
        user_id: &str,
        work_term_id: Uuid,
    ) -> Result<u64, EngineError> {
        let mut state = self.state();
        let before = state.work_terms.len();
        state
            .work_terms
            .retain(|w| !(w.id == work_term_id && w.user_id == user_id));
        Ok((before - state.work_terms.len()) as u64)
    }
}
