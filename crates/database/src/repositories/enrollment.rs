use super::persistence;
use crate::entities::enrollments;
use async_trait::async_trait;
use chrono::Utc;
use models::{
    error::EngineError,
    records::{Enrollment, NewEnrollment},
    term::Term,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// A user's enrollments, optionally limited to one term
    async fn enrollments_for_user(
        &self,
        user_id: &str,
        term: Option<Term>,
    ) -> Result<Vec<Enrollment>, EngineError>;

    async fn count_enrollments(&self, user_id: &str, term: Term) -> Result<u64, EngineError>;

    async fn insert_enrollment(&self, enrollment: NewEnrollment)
    -> Result<Enrollment, EngineError>;

    /// Removes the enrollment row, returning the number of rows deleted
    async fn delete_enrollment(
        &self,
        user_id: &str,
        course_id: Uuid,
        term: Term,
    ) -> Result<u64, EngineError>;
}

#[async_trait]
impl EnrollmentRepository for DatabaseConnection {
    async fn enrollments_for_user(
        &self,
        user_id: &str,
        term: Option<Term>,
    ) -> Result<Vec<Enrollment>, EngineError> {
        let mut query = enrollments::Entity::find()
            .filter(enrollments::Column::UserId.eq(user_id))
            .filter(enrollments::Column::Status.eq(enrollments::ENROLLED));

        if let Some(term) = term {
            query = query.filter(enrollments::Column::Term.eq(term.to_string()));
        }

        query
            .order_by_asc(enrollments::Column::CreatedAt)
            .all(self)
            .await
            .map_err(persistence)?
            .into_iter()
            .map(enrollments::Model::into_record)
            .collect()
    }

    async fn count_enrollments(&self, user_id: &str, term: Term) -> Result<u64, EngineError> {
        enrollments::Entity::find()
            .filter(enrollments::Column::UserId.eq(user_id))
            .filter(enrollments::Column::Term.eq(term.to_string()))
            .filter(enrollments::Column::Status.eq(enrollments::ENROLLED))
            .count(self)
            .await
            .map_err(persistence)
    }

    async fn insert_enrollment(
        &self,
        enrollment: NewEnrollment,
    ) -> Result<Enrollment, EngineError> {
        enrollments::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(enrollment.user_id),
            course_id: Set(enrollment.course_id),
            term: Set(enrollment.term.to_string()),
            status: Set(enrollments::ENROLLED.to_string()),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(self)
        .await
        .map_err(persistence)?
        .into_record()
    }

    async fn delete_enrollment(
        &self,
        user_id: &str,
        course_id: Uuid,
        term: Term,
    ) -> Result<u64, EngineError> {
        let result = enrollments::Entity::delete_many()
            .filter(enrollments::Column::UserId.eq(user_id))
            .filter(enrollments::Column::CourseId.eq(course_id))
            .filter(enrollments::Column::Term.eq(term.to_string()))
            .exec(self)
            .await
            .map_err(persistence)?;

        Ok(result.rows_affected)
    }
}
