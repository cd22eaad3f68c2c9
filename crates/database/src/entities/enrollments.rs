use models::{error::EngineError, records::Enrollment, term::Term};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Only active enrollments are stored. Dropping a course deletes the row
pub const ENROLLED: &str = "enrolled";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub course_id: Uuid,
    pub term: String, // Fall, Winter, Spring, Summer
    pub status: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> Result<Enrollment, EngineError> {
        let term = Term::from_str(&self.term).map_err(|_| {
            EngineError::Persistence(format!(
                "Unknown term '{}' on enrollment {}",
                self.term, self.id
            ))
        })?;

        Ok(Enrollment {
            id: self.id,
            user_id: self.user_id,
            course_id: self.course_id,
            term,
            created_at: self.created_at,
        })
    }
}
