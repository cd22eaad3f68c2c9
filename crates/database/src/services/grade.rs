use crate::{
    repositories::{GradeRepository, PrerequisiteRepository},
    services::locks::KeyedLocks,
};
use chrono::{Datelike, Utc};
use cipher::GradeCipher;
use futures::future::try_join_all;
use log::{debug, info, warn};
use models::{
    error::{EngineError, require_user},
    grade::validate_grade_input,
    prerequisite::{self, completed_grades},
    records::{DecryptedGrade, GradeChange, GradeStatus, NewStudentGrade, StudentGrade},
    response::{DeleteMethod, DeleteOutcome, GradeOutcome, ResetOutcome, SaveOutcome, ToggleOutcome},
};
use std::{collections::BTreeSet, sync::Arc};
use uuid::Uuid;

/// Term recorded for grades saved from the program checklist
pub const CURRENT_TERM: &str = "Current";

type GradeKey = (String, String, Option<Uuid>);

/// Grade writes and reads for a single user at a time
pub struct GradeService<R> {
    repo: Arc<R>,
    cipher: Arc<GradeCipher>,
    locks: KeyedLocks<GradeKey>,
}

impl<R> GradeService<R>
where
    R: GradeRepository + PrerequisiteRepository,
{
    pub fn new(repo: Arc<R>, cipher: Arc<GradeCipher>) -> Self {
        Self {
            repo,
            cipher,
            locks: KeyedLocks::new(),
        }
    }

    fn key(user_id: &str, course_code: &str, requirement_id: Option<Uuid>) -> GradeKey {
        (user_id.to_string(), course_code.to_string(), requirement_id)
    }

    /// The record a checklist save or toggle applies to.
    ///
    /// The requirement must match exactly: without one, only a record linked to no requirement
    /// matches, so a checklist slot is never claimed by an unlinked save.
    async fn find_slot(
        &self,
        user_id: &str,
        course_code: &str,
        requirement_id: Option<Uuid>,
    ) -> Result<Option<StudentGrade>, EngineError> {
        let grades = self.repo.grades_for_course(user_id, course_code).await?;

        Ok(grades
            .into_iter()
            .find(|grade| grade.requirement_id == requirement_id))
    }

    /// Checks that every prerequisite of `course_code` is completed with its minimum grade.
    ///
    /// Grades that cannot be decrypted never satisfy a minimum.
    pub async fn check_prerequisites(
        &self,
        course_code: &str,
        user_id: &str,
    ) -> Result<(), EngineError> {
        let edges = self.repo.prerequisites_for(course_code).await?;
        if edges.is_empty() {
            return Ok(());
        }

        let codes: BTreeSet<&str> = edges
            .iter()
            .map(|edge| edge.prerequisite_code.as_str())
            .collect();
        let records = try_join_all(
            codes
                .into_iter()
                .map(|code| self.repo.grades_for_course(user_id, code)),
        )
        .await?;

        let completed: Vec<StudentGrade> = records
            .into_iter()
            .flatten()
            .filter(|record| record.status == GradeStatus::Completed)
            .collect();
        let decrypted = reveal_records(&self.cipher, user_id, completed);

        prerequisite::check(course_code, &edges, &completed_grades(&decrypted)).map_err(|e| {
            info!(
                "Prerequisite check failed for {} (user {}): {}",
                course_code, user_id, e
            );
            EngineError::from(e)
        })
    }

    /// Records a new completed grade for a course, after checking its prerequisites.
    ///
    /// # Arguments
    /// * `user_id` - The authenticated user
    /// * `course_code` - Course the grade is for
    /// * `grade` - Plaintext grade, numeric (0-100) or a letter
    /// * `term` - Term the course was taken in
    /// * `year` - Year the course was taken in
    pub async fn add_grade(
        &self,
        user_id: &str,
        course_code: &str,
        grade: &str,
        term: &str,
        year: i32,
    ) -> Result<GradeOutcome, EngineError> {
        let user_id = require_user(user_id)?;
        let (course_code, term) = (course_code.trim(), term.trim());
        if course_code.is_empty() || grade.trim().is_empty() || term.is_empty() {
            return Err(EngineError::Validation(
                "Course code, grade, term, and year are required".to_string(),
            ));
        }
        validate_grade_input(grade)?;

        let _guard = self.locks.lock(Self::key(user_id, course_code, None)).await;

        let existing = self.repo.grades_for_course(user_id, course_code).await?;
        if existing.iter().any(|g| g.requirement_id.is_none()) {
            return Err(EngineError::Validation(format!(
                "A grade for {course_code} already exists"
            )));
        }

        self.check_prerequisites(course_code, user_id).await?;

        let encrypted = self.cipher.encrypt(grade.trim(), user_id)?;
        let record = self
            .repo
            .insert_grade(NewStudentGrade {
                user_id: user_id.to_string(),
                course_code: course_code.to_string(),
                requirement_id: None,
                grade: Some(encrypted),
                term: term.to_string(),
                year,
                status: GradeStatus::Completed,
            })
            .await?;

        info!("Added grade {} for {} (user {})", record.id, course_code, user_id);
        Ok(GradeOutcome {
            grade_id: record.id,
            status: record.status,
        })
    }

    /// Replaces the value of an existing grade. Prerequisites are not re-checked
    pub async fn update_grade(
        &self,
        user_id: &str,
        grade_id: Uuid,
        grade: &str,
    ) -> Result<GradeOutcome, EngineError> {
        let user_id = require_user(user_id)?;
        if grade.trim().is_empty() {
            return Err(EngineError::Validation(
                "Grade ID and grade value are required".to_string(),
            ));
        }
        validate_grade_input(grade)?;

        let current = self
            .repo
            .find_grade(user_id, grade_id)
            .await?
            .ok_or_else(|| {
                EngineError::NotFound("Could not retrieve current grade record".to_string())
            })?;

        let _guard = self
            .locks
            .lock(Self::key(user_id, &current.course_code, current.requirement_id))
            .await;

        let encrypted = self.cipher.encrypt(grade.trim(), user_id)?;
        let record = self
            .repo
            .update_grade(user_id, grade_id, GradeChange::completed(encrypted))
            .await?
            .ok_or_else(|| EngineError::NotFound("Grade not found".to_string()))?;

        info!("Updated grade {} (user {})", grade_id, user_id);
        Ok(GradeOutcome {
            grade_id: record.id,
            status: record.status,
        })
    }

    /// Deletes a grade, falling back through progressively blunter strategies.
    ///
    /// 1. Delete by id and user.
    /// 2. Verify the owner, then delete by id alone.
    /// 3. Clear the value, leaving an in-progress marker.
    pub async fn delete_grade(
        &self,
        user_id: &str,
        grade_id: Uuid,
    ) -> Result<DeleteOutcome, EngineError> {
        let user_id = require_user(user_id)?;

        match self.repo.delete_grade(user_id, grade_id).await {
            Ok(rows) if rows > 0 => {
                info!("Deleted grade {} (user {})", grade_id, user_id);
                return Ok(DeleteOutcome {
                    method: DeleteMethod::Scoped,
                });
            }
            Ok(_) => warn!(
                "Scoped delete of grade {} removed no rows, trying unscoped delete",
                grade_id
            ),
            Err(e) => warn!(
                "Scoped delete of grade {} failed ({}), trying unscoped delete",
                grade_id, e
            ),
        }

        match self.repo.grade_owner(grade_id).await {
            Ok(None) => return Err(EngineError::NotFound("Grade not found".to_string())),
            Ok(Some(owner)) if owner.trim() != user_id => {
                warn!(
                    "User {} attempted to delete grade {} owned by another user",
                    user_id, grade_id
                );
                return Err(EngineError::Forbidden(
                    "You don't have permission to delete this grade".to_string(),
                ));
            }
            Ok(Some(_)) => match self.repo.delete_grade_by_id(grade_id).await {
                Ok(rows) if rows > 0 => {
                    info!("Deleted grade {} via unscoped delete", grade_id);
                    return Ok(DeleteOutcome {
                        method: DeleteMethod::Unscoped,
                    });
                }
                Ok(_) => warn!("Unscoped delete of grade {} removed no rows", grade_id),
                Err(e) => warn!("Unscoped delete of grade {} failed: {}", grade_id, e),
            },
            Err(e) => warn!("Could not look up owner of grade {}: {}", grade_id, e),
        }

        warn!("Clearing grade {} instead of deleting it", grade_id);
        self.repo
            .update_grade(user_id, grade_id, GradeChange::in_progress())
            .await?
            .ok_or_else(|| EngineError::NotFound("Grade not found".to_string()))?;

        Ok(DeleteOutcome {
            method: DeleteMethod::Cleared,
        })
    }

    /// Saves a grade from the program checklist.
    ///
    /// An empty grade removes an existing record. A new record is only created once its
    /// prerequisites are met; edits to an existing record skip that check.
    pub async fn save_grade(
        &self,
        user_id: &str,
        course_code: &str,
        grade: &str,
        requirement_id: Option<Uuid>,
    ) -> Result<SaveOutcome, EngineError> {
        let user_id = require_user(user_id)?;
        let course_code = course_code.trim();
        if course_code.is_empty() {
            return Err(EngineError::Validation("Course code is required".to_string()));
        }

        let _guard = self
            .locks
            .lock(Self::key(user_id, course_code, requirement_id))
            .await;

        let existing = self.find_slot(user_id, course_code, requirement_id).await?;

        if grade.trim().is_empty()
            && let Some(record) = &existing
        {
            self.repo.delete_grade(user_id, record.id).await?;
            info!("Removed grade {} for {} (user {})", record.id, course_code, user_id);
            return Ok(SaveOutcome::Deleted);
        }

        validate_grade_input(grade)?;
        let grade = grade.trim();

        match existing {
            Some(record) => {
                let encrypted = self.cipher.encrypt(grade, user_id)?;
                let updated = self
                    .repo
                    .update_grade(user_id, record.id, GradeChange::completed(encrypted))
                    .await?
                    .ok_or_else(|| EngineError::NotFound("Grade not found".to_string()))?;

                debug!("Saved grade {} for {}", updated.id, course_code);
                Ok(SaveOutcome::Updated {
                    grade_id: updated.id,
                })
            }
            None => {
                self.check_prerequisites(course_code, user_id).await?;

                let encrypted = self.cipher.encrypt(grade, user_id)?;
                let created = self
                    .repo
                    .insert_grade(NewStudentGrade {
                        user_id: user_id.to_string(),
                        course_code: course_code.to_string(),
                        requirement_id,
                        grade: Some(encrypted),
                        term: CURRENT_TERM.to_string(),
                        year: Utc::now().year(),
                        status: GradeStatus::Completed,
                    })
                    .await?;

                info!("Created grade {} for {} (user {})", created.id, course_code, user_id);
                Ok(SaveOutcome::Created {
                    grade_id: created.id,
                })
            }
        }
    }

    /// Marks a course as currently being taken, or removes that marker.
    ///
    /// A completed record is turned back into an in-progress marker and loses its grade.
    pub async fn toggle_course_status(
        &self,
        user_id: &str,
        course_code: &str,
        requirement_id: Option<Uuid>,
    ) -> Result<ToggleOutcome, EngineError> {
        let user_id = require_user(user_id)?;
        let course_code = course_code.trim();
        if course_code.is_empty() {
            return Err(EngineError::Validation("Course code is required".to_string()));
        }

        let _guard = self
            .locks
            .lock(Self::key(user_id, course_code, requirement_id))
            .await;

        match self.find_slot(user_id, course_code, requirement_id).await? {
            Some(record) if record.status == GradeStatus::InProgress => {
                self.repo.delete_grade(user_id, record.id).await?;
                info!("Removed {} from in-progress courses (user {})", course_code, user_id);
                Ok(ToggleOutcome {
                    is_in_progress: false,
                })
            }
            Some(record) => {
                self.repo
                    .update_grade(user_id, record.id, GradeChange::in_progress())
                    .await?
                    .ok_or_else(|| EngineError::NotFound("Grade not found".to_string()))?;
                info!("Moved {} back to in-progress (user {})", course_code, user_id);
                Ok(ToggleOutcome {
                    is_in_progress: true,
                })
            }
            None => {
                self.repo
                    .insert_grade(NewStudentGrade {
                        user_id: user_id.to_string(),
                        course_code: course_code.to_string(),
                        requirement_id,
                        grade: None,
                        term: CURRENT_TERM.to_string(),
                        year: Utc::now().year(),
                        status: GradeStatus::InProgress,
                    })
                    .await?;
                info!("Added {} to in-progress courses (user {})", course_code, user_id);
                Ok(ToggleOutcome {
                    is_in_progress: true,
                })
            }
        }
    }

    /// Every grade record of the user with its decrypted value.
    ///
    /// A record that fails to decrypt carries the error sentinel instead of failing the list.
    pub async fn list_grades(&self, user_id: &str) -> Result<Vec<DecryptedGrade>, EngineError> {
        let user_id = require_user(user_id)?;
        let records = self.repo.grades_for_user(user_id).await?;

        let grades = reveal_records(&self.cipher, user_id, records);

        let unreadable = grades.iter().filter(|g| g.revealed.is_error()).count();
        if unreadable > 0 {
            warn!(
                "{} of {} grades for user {} could not be decrypted",
                unreadable,
                grades.len(),
                user_id
            );
        }

        Ok(grades)
    }

    /// Removes every grade of the user, as when they switch programs
    pub async fn reset_program(&self, user_id: &str) -> Result<ResetOutcome, EngineError> {
        let user_id = require_user(user_id)?;
        let deleted = self.repo.delete_grades_for_user(user_id).await?;

        info!("Deleted {} grades for user {} on program switch", deleted, user_id);
        Ok(ResetOutcome { deleted })
    }
}

/// Pairs each record with its decrypted value under the owner's key
pub(crate) fn reveal_records(
    cipher: &GradeCipher,
    user_id: &str,
    records: Vec<StudentGrade>,
) -> Vec<DecryptedGrade> {
    let key = cipher.for_user(user_id);

    records
        .into_iter()
        .map(|record| DecryptedGrade {
            revealed: key.reveal(record.grade.as_deref()),
            record,
        })
        .collect()
}
