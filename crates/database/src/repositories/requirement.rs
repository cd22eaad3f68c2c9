use super::persistence;
use crate::entities::program_requirements;
use async_trait::async_trait;
use models::{error::EngineError, records::ProgramRequirement};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

#[async_trait]
pub trait RequirementRepository: Send + Sync {
    /// Requirement slots of a program, by year
    async fn requirements_for_program(
        &self,
        program_id: i32,
    ) -> Result<Vec<ProgramRequirement>, EngineError>;
}

#[async_trait]
impl RequirementRepository for DatabaseConnection {
    async fn requirements_for_program(
        &self,
        program_id: i32,
    ) -> Result<Vec<ProgramRequirement>, EngineError> {
        let requirements = program_requirements::Entity::find()
            .filter(program_requirements::Column::ProgramId.eq(program_id))
            .order_by_asc(program_requirements::Column::Year)
            .order_by_asc(program_requirements::Column::CourseCode)
            .all(self)
            .await
            .map_err(persistence)?;

        Ok(requirements
            .into_iter()
            .map(ProgramRequirement::from)
            .collect())
    }
}
