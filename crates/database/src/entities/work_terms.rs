use models::{error::EngineError, records::WorkTerm};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_terms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub term_name: String,
    pub status: String, // "", in-progress, completed
    pub company_name: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> Result<WorkTerm, EngineError> {
        let status = self.status.parse().map_err(EngineError::Persistence)?;

        Ok(WorkTerm {
            id: self.id,
            user_id: self.user_id,
            term_name: self.term_name,
            status,
            company_name: self.company_name,
            created_at: self.created_at,
        })
    }
}
