use models::records::ProgramRequirement;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "program_requirements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub program_id: i32,
    pub year: i32,
    pub course_code: String,
    pub credit_weight: f64,
    pub requirement_type: String,
    pub min_grade: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::student_grades::Entity")]
    StudentGrades,
}

impl Related<super::student_grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentGrades.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProgramRequirement {
    fn from(model: Model) -> Self {
        ProgramRequirement {
            id: model.id,
            program_id: model.program_id,
            year: model.year,
            course_code: model.course_code,
            credit_weight: model.credit_weight,
            requirement_type: model.requirement_type,
            min_grade: model.min_grade,
        }
    }
}
