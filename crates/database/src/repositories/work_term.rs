use super::persistence;
use crate::entities::work_terms;
use async_trait::async_trait;
use chrono::Utc;
use models::{
    error::EngineError,
    records::{NewWorkTerm, WorkTerm, WorkTermChange},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};
use uuid::Uuid;

#[async_trait]
pub trait WorkTermRepository: Send + Sync {
    /// A user's work terms, oldest first
    async fn work_terms_for_user(&self, user_id: &str) -> Result<Vec<WorkTerm>, EngineError>;

    async fn find_work_term(
        &self,
        user_id: &str,
        work_term_id: Uuid,
    ) -> Result<Option<WorkTerm>, EngineError>;

    async fn find_work_term_by_name(
        &self,
        user_id: &str,
        term_name: &str,
    ) -> Result<Option<WorkTerm>, EngineError>;

    async fn insert_work_term(&self, work_term: NewWorkTerm) -> Result<WorkTerm, EngineError>;

    /// # Returns
    /// The updated work term, or `None` if the user owns none with that id
    async fn update_work_term(
        &self,
        user_id: &str,
        work_term_id: Uuid,
        change: WorkTermChange,
    ) -> Result<Option<WorkTerm>, EngineError>;

    async fn delete_work_term(&self, user_id: &str, work_term_id: Uuid)
    -> Result<u64, EngineError>;
}

#[async_trait]
impl WorkTermRepository for DatabaseConnection {
    async fn work_terms_for_user(&self, user_id: &str) -> Result<Vec<WorkTerm>, EngineError> {
        work_terms::Entity::find()
            .filter(work_terms::Column::UserId.eq(user_id))
            .order_by_asc(work_terms::Column::CreatedAt)
            .all(self)
            .await
            .map_err(persistence)?
            .into_iter()
            .map(work_terms::Model::into_record)
            .collect()
    }

    async fn find_work_term(
        &self,
        user_id: &str,
        work_term_id: Uuid,
    ) -> Result<Option<WorkTerm>, EngineError> {
        work_terms::Entity::find_by_id(work_term_id)
            .filter(work_terms::Column::UserId.eq(user_id))
            .one(self)
            .await
            .map_err(persistence)?
            .map(work_terms::Model::into_record)
            .transpose()
    }

    async fn find_work_term_by_name(
        &self,
        user_id: &str,
        term_name: &str,
    ) -> Result<Option<WorkTerm>, EngineError> {
        work_terms::Entity::find()
            .filter(work_terms::Column::UserId.eq(user_id))
            .filter(work_terms::Column::TermName.eq(term_name))
            .one(self)
            .await
            .map_err(persistence)?
            .map(work_terms::Model::into_record)
            .transpose()
    }

    async fn insert_work_term(&self, work_term: NewWorkTerm) -> Result<WorkTerm, EngineError> {
        work_terms::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(work_term.user_id),
            term_name: Set(work_term.term_name),
            status: Set(work_term.status.as_str().to_string()),
            company_name: Set(work_term.company_name),
            created_at: Set(Utc::now().naive_utc()),
        }
        .insert(self)
        .await
        .map_err(persistence)?
        .into_record()
    }

    async fn update_work_term(
        &self,
        user_id: &str,
        work_term_id: Uuid,
        change: WorkTermChange,
    ) -> Result<Option<WorkTerm>, EngineError> {
        let Some(existing) = work_terms::Entity::find_by_id(work_term_id)
            .filter(work_terms::Column::UserId.eq(user_id))
            .one(self)
            .await
            .map_err(persistence)?
        else {
            return Ok(None);
        };

        let mut active: work_terms::ActiveModel = existing.into();
        if let Some(status) = change.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(company_name) = change.company_name {
            active.company_name = Set(Some(company_name));
        }

        active
            .update(self)
            .await
            .map_err(persistence)?
            .into_record()
            .map(Some)
    }

    async fn delete_work_term(
        &self,
        user_id: &str,
        work_term_id: Uuid,
    ) -> Result<u64, EngineError> {
        let result = work_terms::Entity::delete_many()
            .filter(work_terms::Column::Id.eq(work_term_id))
            .filter(work_terms::Column::UserId.eq(user_id))
            .exec(self)
            .await
            .map_err(persistence)?;

        Ok(result.rows_affected)
    }
}
