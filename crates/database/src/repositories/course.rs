use super::persistence;
use crate::entities::courses;
use async_trait::async_trait;
use models::{error::EngineError, records::Course};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn find_course(&self, course_id: Uuid) -> Result<Option<Course>, EngineError>;

    /// Courses with the given ids. Unknown ids are skipped
    async fn courses_by_ids(&self, course_ids: &[Uuid]) -> Result<Vec<Course>, EngineError>;
}

#[async_trait]
impl CourseRepository for DatabaseConnection {
    async fn find_course(&self, course_id: Uuid) -> Result<Option<Course>, EngineError> {
        let course = courses::Entity::find_by_id(course_id)
            .one(self)
            .await
            .map_err(persistence)?;

        Ok(course.map(Course::from))
    }

    async fn courses_by_ids(&self, course_ids: &[Uuid]) -> Result<Vec<Course>, EngineError> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let courses = courses::Entity::find()
            .filter(courses::Column::Id.is_in(course_ids.iter().copied()))
            .all(self)
            .await
            .map_err(persistence)?;

        Ok(courses.into_iter().map(Course::from).collect())
    }
}
