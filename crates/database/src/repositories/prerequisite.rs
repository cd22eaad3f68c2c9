use super::persistence;
use crate::entities::course_prerequisites;
use async_trait::async_trait;
use models::{error::EngineError, records::PrerequisiteEdge};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

#[async_trait]
pub trait PrerequisiteRepository: Send + Sync {
    /// Every prerequisite edge leaving `course_code`
    async fn prerequisites_for(
        &self,
        course_code: &str,
    ) -> Result<Vec<PrerequisiteEdge>, EngineError>;
}

#[async_trait]
impl PrerequisiteRepository for DatabaseConnection {
    async fn prerequisites_for(
        &self,
        course_code: &str,
    ) -> Result<Vec<PrerequisiteEdge>, EngineError> {
        let edges = course_prerequisites::Entity::find()
            .filter(course_prerequisites::Column::CourseCode.eq(course_code))
            .all(self)
            .await
            .map_err(persistence)?;

        Ok(edges.into_iter().map(PrerequisiteEdge::from).collect())
    }
}
