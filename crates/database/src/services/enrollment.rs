use crate::{
    repositories::{CourseRepository, EnrollmentRepository},
    services::locks::KeyedLocks,
};
use chrono::NaiveDate;
use log::{info, warn};
use models::{
    error::{EngineError, require_user},
    records::{Course, NewEnrollment},
    response::{Ack, EnrollOutcome},
    schedule::find_conflicts,
    term::{RegistrationWindow, Term},
};
use std::sync::Arc;
use uuid::Uuid;

pub struct EnrollmentService<R> {
    repo: Arc<R>,
    locks: KeyedLocks<String>,
}

impl<R> EnrollmentService<R>
where
    R: CourseRepository + EnrollmentRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            locks: KeyedLocks::new(),
        }
    }

    /// Rejects the request when the user already holds the maximum number of courses for `term`
    pub async fn can_enroll(&self, user_id: &str, term: Term) -> Result<(), EngineError> {
        let user_id = require_user(user_id)?;
        let count = self.repo.count_enrollments(user_id, term).await?;
        let limit = term.max_courses();

        if count >= limit as u64 {
            warn!(
                "User {} is at the {} course limit for {}",
                user_id, limit, term
            );
            return Err(EngineError::CapacityReached { term, limit });
        }

        Ok(())
    }

    /// Enrolls the user in a course.
    ///
    /// Checks run in order: duration eligibility for `as_of`, duplicate enrollment, schedule
    /// conflicts with the term's other courses, then the term's course limit. A schedule
    /// conflict is returned as a warning unless `confirm_conflicts` is set.
    ///
    /// # Arguments
    /// * `user_id` - The authenticated user
    /// * `course_id` - Course to enroll in
    /// * `term` - Term to enroll for
    /// * `confirm_conflicts` - Whether the user accepted overlapping courses
    /// * `as_of` - Date used for the registration window
    pub async fn enroll(
        &self,
        user_id: &str,
        course_id: Uuid,
        term: Term,
        confirm_conflicts: bool,
        as_of: NaiveDate,
    ) -> Result<EnrollOutcome, EngineError> {
        let user_id = require_user(user_id)?;
        let _guard = self.locks.lock(user_id.to_string()).await;

        let course = self
            .repo
            .find_course(course_id)
            .await?
            .ok_or_else(|| EngineError::NotFound("Course not found".to_string()))?;

        let window = RegistrationWindow::for_date(as_of);
        if !window.allows(course.course_duration.as_deref()) {
            info!(
                "Rejected {} ({:?}) outside its registration window",
                course.course_code, course.course_duration
            );
            return Err(EngineError::DurationIneligible(
                window.restriction_message().to_string(),
            ));
        }

        let enrollments = self.repo.enrollments_for_user(user_id, None).await?;
        if enrollments.iter().any(|e| e.course_id == course_id) {
            return Err(EngineError::AlreadyEnrolled);
        }

        let same_term: Vec<Uuid> = enrollments
            .iter()
            .filter(|e| e.term == term)
            .map(|e| e.course_id)
            .collect();
        let enrolled = self.repo.courses_by_ids(&same_term).await?;
        let conflicts: Vec<Course> = find_conflicts(&course, &enrolled)
            .into_iter()
            .cloned()
            .collect();

        if !conflicts.is_empty() && !confirm_conflicts {
            warn!(
                "{} conflicts with {} enrolled course(s) for user {}",
                course.course_code,
                conflicts.len(),
                user_id
            );
            return Err(EngineError::ScheduleConflict { conflicts });
        }

        self.can_enroll(user_id, term).await?;

        let enrollment = self
            .repo
            .insert_enrollment(NewEnrollment {
                user_id: user_id.to_string(),
                course_id,
                term,
            })
            .await?;

        info!(
            "Enrolled user {} in {} for {}",
            user_id, course.course_code, term
        );
        Ok(EnrollOutcome {
            enrollment_id: enrollment.id,
            overridden_conflicts: conflicts.into_iter().map(|c| c.course_code).collect(),
        })
    }

    /// Drops a course. The enrollment row is removed outright
    pub async fn drop_course(
        &self,
        user_id: &str,
        course_id: Uuid,
        term: Term,
    ) -> Result<Ack, EngineError> {
        let user_id = require_user(user_id)?;
        let _guard = self.locks.lock(user_id.to_string()).await;

        let removed = self.repo.delete_enrollment(user_id, course_id, term).await?;
        if removed == 0 {
            return Err(EngineError::NotFound("Enrollment not found".to_string()));
        }

        info!("Dropped course {} for user {} ({})", course_id, user_id, term);
        Ok(Ack {})
    }

    /// Courses the user is enrolled in for `term`
    pub async fn enrolled_courses(
        &self,
        user_id: &str,
        term: Term,
    ) -> Result<Vec<Course>, EngineError> {
        let user_id = require_user(user_id)?;
        let enrollments = self.repo.enrollments_for_user(user_id, Some(term)).await?;
        let course_ids: Vec<Uuid> = enrollments.iter().map(|e| e.course_id).collect();

        self.repo.courses_by_ids(&course_ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory::MemoryStore;

    const USER: &str = "user-1";

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn setup() -> (Arc<MemoryStore>, EnrollmentService<MemoryStore>) {
        let _ = env_logger::builder().is_test(true).try_init();
        let store = Arc::new(MemoryStore::default());
        let service = EnrollmentService::new(Arc::clone(&store));
        (store, service)
    }

    #[tokio::test]
    async fn test_enroll_and_drop() {
        let (store, service) = setup();
        let course = store.add_course("COSC 1P02", "MW", "9:00-10:30", "D2");

        let outcome = service
            .enroll(USER, course.id, Term::Fall, false, date(2025, 9, 2))
            .await
            .unwrap();
        assert!(outcome.overridden_conflicts.is_empty());
        assert_eq!(store.enrollments().len(), 1);

        let courses = service.enrolled_courses(USER, Term::Fall).await.unwrap();
        assert_eq!(courses, vec![course.clone()]);

        service.drop_course(USER, course.id, Term::Fall).await.unwrap();
        assert!(store.enrollments().is_empty());

        let err = service.drop_course(USER, course.id, Term::Fall).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_duration_window() {
        let (store, service) = setup();
        let winter = store.add_course("COSC 1P03", "TR", "9:00-10:30", "D3");
        let full_year = store.add_course("COSC 1P71", "F", "13:00-15:00", "D1");

        let err = service
            .enroll(USER, winter.id, Term::Fall, false, date(2025, 10, 1))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::DurationIneligible(RegistrationWindow::Fall.restriction_message().to_string())
        );

        assert!(
            service
                .enroll(USER, full_year.id, Term::Fall, false, date(2025, 10, 1))
                .await
                .is_ok()
        );
        assert!(
            service
                .enroll(USER, winter.id, Term::Spring, false, date(2025, 6, 1))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_already_enrolled_in_any_term() {
        let (store, service) = setup();
        let course = store.add_course("COSC 1P02", "MW", "9:00-10:30", "D2");
        let as_of = date(2025, 6, 1);

        service.enroll(USER, course.id, Term::Fall, false, as_of).await.unwrap();
        let err = service
            .enroll(USER, course.id, Term::Winter, false, as_of)
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::AlreadyEnrolled);
    }

    #[tokio::test]
    async fn test_conflict_warning_and_override() {
        let (store, service) = setup();
        let as_of = date(2025, 9, 2);
        let first = store.add_course("COSC 1P02", "MW", "9:00-10:30", "D2");
        let clash = store.add_course("MATH 1P66", "W", "10:00-11:00", "D2");

        service.enroll(USER, first.id, Term::Fall, false, as_of).await.unwrap();

        let err = service
            .enroll(USER, clash.id, Term::Fall, false, as_of)
            .await
            .unwrap_err();
        assert!(err.is_warning());
        let EngineError::ScheduleConflict { conflicts } = err else {
            panic!("expected a schedule conflict");
        };
        assert_eq!(conflicts, vec![first.clone()]);

        let outcome = service
            .enroll(USER, clash.id, Term::Fall, true, as_of)
            .await
            .unwrap();
        assert_eq!(outcome.overridden_conflicts, vec!["COSC 1P02".to_string()]);
    }

    #[tokio::test]
    async fn test_conflicts_only_within_term() {
        let (store, service) = setup();
        let as_of = date(2025, 6, 1);
        let fall = store.add_course("COSC 1P02", "MW", "9:00-10:30", "D2");
        let winter = store.add_course("COSC 1P03", "MW", "9:00-10:30", "D3");

        service.enroll(USER, fall.id, Term::Fall, false, as_of).await.unwrap();
        assert!(
            service
                .enroll(USER, winter.id, Term::Winter, false, as_of)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_spring_capacity() {
        let (store, service) = setup();
        let as_of = date(2025, 5, 1);

        for (code, time) in [
            ("COSC 1P01", "8:00-8:30"),
            ("COSC 2P01", "10:00-10:30"),
            ("COSC 3P01", "12:00-12:30"),
        ] {
            let course = store.add_course(code, "F", time, "D1");
            service
                .enroll(USER, course.id, Term::Spring, false, as_of)
                .await
                .unwrap();
        }
        assert!(service.can_enroll(USER, Term::Spring).await.is_ok());

        let fourth = store.add_course("COSC 4P01", "S", "8:00-9:00", "D1");
        service.enroll(USER, fourth.id, Term::Spring, false, as_of).await.unwrap();

        let err = service.can_enroll(USER, Term::Spring).await.unwrap_err();
        assert_eq!(
            err,
            EngineError::CapacityReached {
                term: Term::Spring,
                limit: 4
            }
        );

        let fifth = store.add_course("COSC 5P01", "S", "10:00-11:00", "D1");
        let err = service
            .enroll(USER, fifth.id, Term::Spring, false, as_of)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::CapacityReached { .. }));

        // Other terms keep their own count
        assert!(service.can_enroll(USER, Term::Fall).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_course() {
        let (_, service) = setup();
        let err = service
            .enroll(USER, Uuid::new_v4(), Term::Fall, false, date(2025, 9, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }
}
