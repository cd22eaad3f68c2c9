use super::persistence;
use crate::entities::student_grades;
use async_trait::async_trait;
use chrono::Utc;
use log::warn;
use models::{
    error::EngineError,
    records::{GradeChange, NewStudentGrade, StudentGrade},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

/// Converts rows into records, skipping rows with an unknown status
fn readable(rows: Vec<student_grades::Model>) -> Vec<StudentGrade> {
    rows.into_iter()
        .filter_map(|row| match row.into_record() {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping unreadable grade record: {}", e);
                None
            }
        })
        .collect()
}

#[async_trait]
pub trait GradeRepository: Send + Sync {
    /// All of a user's grade records, newest year first. Unreadable rows are skipped
    async fn grades_for_user(&self, user_id: &str) -> Result<Vec<StudentGrade>, EngineError>;

    /// A user's records for one course, oldest first
    async fn grades_for_course(
        &self,
        user_id: &str,
        course_code: &str,
    ) -> Result<Vec<StudentGrade>, EngineError>;

    async fn find_grade(
        &self,
        user_id: &str,
        grade_id: Uuid,
    ) -> Result<Option<StudentGrade>, EngineError>;

    async fn insert_grade(&self, grade: NewStudentGrade) -> Result<StudentGrade, EngineError>;

    /// # Returns
    /// The updated record, or `None` if the user owns no record with that id
    async fn update_grade(
        &self,
        user_id: &str,
        grade_id: Uuid,
        change: GradeChange,
    ) -> Result<Option<StudentGrade>, EngineError>;

    /// Deletes a record owned by the user, returning the number of rows removed
    async fn delete_grade(&self, user_id: &str, grade_id: Uuid) -> Result<u64, EngineError>;

    /// Owner of a record, looked up by id alone
    async fn grade_owner(&self, grade_id: Uuid) -> Result<Option<String>, EngineError>;

    /// Deletes by id alone. Callers must have verified ownership first
    async fn delete_grade_by_id(&self, grade_id: Uuid) -> Result<u64, EngineError>;

    async fn delete_grades_for_user(&self, user_id: &str) -> Result<u64, EngineError>;
}

#[async_trait]
impl GradeRepository for DatabaseConnection {
    async fn grades_for_user(&self, user_id: &str) -> Result<Vec<StudentGrade>, EngineError> {
        student_grades::Entity::find()
            .filter(student_grades::Column::UserId.eq(user_id))
            .order_by_desc(student_grades::Column::Year)
            .order_by_asc(student_grades::Column::CreatedAt)
            .all(self)
            .await
            .map_err(persistence)
            .map(readable)
    }

    async fn grades_for_course(
        &self,
        user_id: &str,
        course_code: &str,
    ) -> Result<Vec<StudentGrade>, EngineError> {
        student_grades::Entity::find()
            .filter(student_grades::Column::UserId.eq(user_id))
            .filter(student_grades::Column::CourseCode.eq(course_code))
            .order_by_asc(student_grades::Column::CreatedAt)
            .all(self)
            .await
            .map_err(persistence)
            .map(readable)
    }

    async fn find_grade(
        &self,
        user_id: &str,
        grade_id: Uuid,
    ) -> Result<Option<StudentGrade>, EngineError> {
        student_grades::Entity::find_by_id(grade_id)
            .filter(student_grades::Column::UserId.eq(user_id))
            .one(self)
            .await
            .map_err(persistence)?
            .map(student_grades::Model::into_record)
            .transpose()
    }

    async fn insert_grade(&self, grade: NewStudentGrade) -> Result<StudentGrade, EngineError> {
        let now = Utc::now().naive_utc();

        student_grades::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(grade.user_id),
            course_code: Set(grade.course_code),
            requirement_id: Set(grade.requirement_id),
            grade: Set(grade.grade),
            term: Set(grade.term),
            year: Set(grade.year),
            status: Set(grade.status.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self)
        .await
        .map_err(persistence)?
        .into_record()
    }

    async fn update_grade(
        &self,
        user_id: &str,
        grade_id: Uuid,
        change: GradeChange,
    ) -> Result<Option<StudentGrade>, EngineError> {
        let Some(existing) = student_grades::Entity::find_by_id(grade_id)
            .filter(student_grades::Column::UserId.eq(user_id))
            .one(self)
            .await
            .map_err(persistence)?
        else {
            return Ok(None);
        };

        let mut active: student_grades::ActiveModel = existing.into();
        active.grade = Set(change.grade().map(str::to_string));
        active.status = Set(change.status().to_string());
        active.updated_at = Set(Utc::now().naive_utc());

        active
            .update(self)
            .await
            .map_err(persistence)?
            .into_record()
            .map(Some)
    }

    async fn delete_grade(&self, user_id: &str, grade_id: Uuid) -> Result<u64, EngineError> {
        let result = student_grades::Entity::delete_many()
            .filter(student_grades::Column::Id.eq(grade_id))
            .filter(student_grades::Column::UserId.eq(user_id))
            .exec(self)
            .await
            .map_err(persistence)?;

        Ok(result.rows_affected)
    }

    async fn grade_owner(&self, grade_id: Uuid) -> Result<Option<String>, EngineError> {
        let grade = student_grades::Entity::find_by_id(grade_id)
            .one(self)
            .await
            .map_err(persistence)?;

        Ok(grade.map(|grade| grade.user_id))
    }

    async fn delete_grade_by_id(&self, grade_id: Uuid) -> Result<u64, EngineError> {
        let result = student_grades::Entity::delete_by_id(grade_id)
            .exec(self)
            .await
            .map_err(persistence)?;

        Ok(result.rows_affected)
    }

    async fn delete_grades_for_user(&self, user_id: &str) -> Result<u64, EngineError> {
        let result = student_grades::Entity::delete_many()
            .filter(student_grades::Column::UserId.eq(user_id))
            .exec(self)
            .await
            .map_err(persistence)?;

        Ok(result.rows_affected)
    }
}
