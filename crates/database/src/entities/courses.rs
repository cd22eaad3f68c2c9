use models::records::Course;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_code: String,
    pub course_days: Option<String>, // M, T, W, R, F
    pub class_time: Option<String>,
    pub course_duration: Option<String>, // D1, D2, D3
    pub instructor: Option<String>,
    pub class_type: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Course {
    fn from(model: Model) -> Self {
        Course {
            id: model.id,
            course_code: model.course_code,
            course_days: model.course_days,
            class_time: model.class_time,
            course_duration: model.course_duration,
            instructor: model.instructor,
            class_type: model.class_type,
        }
    }
}
