use models::records::PrerequisiteEdge;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Edge from `course_code` to a course that must be completed first
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_prerequisites")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_code: String,
    pub prerequisite_code: String,
    pub min_grade: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PrerequisiteEdge {
    fn from(model: Model) -> Self {
        PrerequisiteEdge {
            course_code: model.course_code,
            prerequisite_code: model.prerequisite_code,
            min_grade: model.min_grade,
        }
    }
}
