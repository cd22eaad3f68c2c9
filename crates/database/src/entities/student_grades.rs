use models::{
    error::EngineError,
    records::{GradeStatus, StudentGrade},
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student_grades")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub course_code: String,
    pub requirement_id: Option<Uuid>,
    /// Ciphertext, or plaintext for rows written before encryption
    pub grade: Option<String>,
    pub term: String,
    pub year: i32,
    pub status: String, // in-progress, completed
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::program_requirements::Entity",
        from = "Column::RequirementId",
        to = "super::program_requirements::Column::Id"
    )]
    ProgramRequirement,
}

impl Related<super::program_requirements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProgramRequirement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> Result<StudentGrade, EngineError> {
        let status = GradeStatus::from_str(&self.status).map_err(|_| {
            EngineError::Persistence(format!(
                "Unknown grade status '{}' on grade {}",
                self.status, self.id
            ))
        })?;

        Ok(StudentGrade {
            id: self.id,
            user_id: self.user_id,
            course_code: self.course_code,
            requirement_id: self.requirement_id,
            grade: self.grade,
            term: self.term,
            year: self.year,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
