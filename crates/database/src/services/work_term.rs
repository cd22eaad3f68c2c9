use crate::{repositories::WorkTermRepository, services::locks::KeyedLocks};
use log::info;
use models::{
    error::{EngineError, require_user},
    records::{NewWorkTerm, WorkTerm, WorkTermChange, WorkTermStatus},
    response::Ack,
};
use std::sync::Arc;
use uuid::Uuid;

/// Co-op work term tracking. Work terms carry no grade and no credit
pub struct WorkTermService<R> {
    repo: Arc<R>,
    locks: KeyedLocks<(String, String)>,
}

impl<R> WorkTermService<R>
where
    R: WorkTermRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            locks: KeyedLocks::new(),
        }
    }

    /// Looks a work term up by id when one is given, otherwise by name
    async fn resolve(
        &self,
        user_id: &str,
        term_name: &str,
        work_term_id: Option<Uuid>,
    ) -> Result<Option<WorkTerm>, EngineError> {
        match work_term_id {
            Some(id) => self
                .repo
                .find_work_term(user_id, id)
                .await?
                .map(Some)
                .ok_or_else(|| EngineError::NotFound("Work term not found".to_string())),
            None => self.repo.find_work_term_by_name(user_id, term_name).await,
        }
    }

    /// Applies `change` to the existing work term, or creates one from `create` when absent
    async fn upsert<F>(
        &self,
        user_id: &str,
        term_name: &str,
        work_term_id: Option<Uuid>,
        change: F,
        create: NewWorkTerm,
    ) -> Result<WorkTerm, EngineError>
    where
        F: FnOnce(&WorkTerm) -> WorkTermChange + Send,
    {
        let _guard = self
            .locks
            .lock((user_id.to_string(), term_name.to_string()))
            .await;

        match self.resolve(user_id, term_name, work_term_id).await? {
            Some(existing) => {
                let change = change(&existing);
                let updated = self
                    .repo
                    .update_work_term(user_id, existing.id, change)
                    .await?
                    .ok_or_else(|| EngineError::NotFound("Work term not found".to_string()))?;

                info!(
                    "Updated work term {} for user {} (status {:?})",
                    updated.term_name, user_id, updated.status
                );
                Ok(updated)
            }
            None => {
                let created = self.repo.insert_work_term(create).await?;
                info!(
                    "Created work term {} for user {} (status {:?})",
                    created.term_name, user_id, created.status
                );
                Ok(created)
            }
        }
    }

    /// Sets the status (and company, when given) of a work term, creating it if needed
    pub async fn update_work_term(
        &self,
        user_id: &str,
        term_name: &str,
        status: WorkTermStatus,
        company_name: Option<String>,
        work_term_id: Option<Uuid>,
    ) -> Result<WorkTerm, EngineError> {
        let user_id = require_user(user_id)?;
        let create = NewWorkTerm {
            user_id: user_id.to_string(),
            term_name: term_name.to_string(),
            status,
            company_name: company_name.clone(),
        };

        self.upsert(
            user_id,
            term_name,
            work_term_id,
            move |_| WorkTermChange {
                status: Some(status),
                company_name,
            },
            create,
        )
        .await
    }

    async fn toggle(
        &self,
        user_id: &str,
        term_name: &str,
        work_term_id: Option<Uuid>,
        target: WorkTermStatus,
    ) -> Result<WorkTerm, EngineError> {
        let user_id = require_user(user_id)?;
        let create = NewWorkTerm {
            user_id: user_id.to_string(),
            term_name: term_name.to_string(),
            status: target,
            company_name: None,
        };

        self.upsert(
            user_id,
            term_name,
            work_term_id,
            |existing| WorkTermChange {
                status: Some(if existing.status == target {
                    WorkTermStatus::NotStarted
                } else {
                    target
                }),
                company_name: None,
            },
            create,
        )
        .await
    }

    /// Flips between in progress and not started
    pub async fn toggle_work_term_in_progress(
        &self,
        user_id: &str,
        term_name: &str,
        work_term_id: Option<Uuid>,
    ) -> Result<WorkTerm, EngineError> {
        self.toggle(user_id, term_name, work_term_id, WorkTermStatus::InProgress)
            .await
    }

    /// Flips between completed and not started
    pub async fn toggle_work_term_completed(
        &self,
        user_id: &str,
        term_name: &str,
        work_term_id: Option<Uuid>,
    ) -> Result<WorkTerm, EngineError> {
        self.toggle(user_id, term_name, work_term_id, WorkTermStatus::Completed)
            .await
    }

    pub async fn mark_work_term_completed(
        &self,
        user_id: &str,
        term_name: &str,
        work_term_id: Option<Uuid>,
    ) -> Result<WorkTerm, EngineError> {
        self.update_work_term(
            user_id,
            term_name,
            WorkTermStatus::Completed,
            None,
            work_term_id,
        )
        .await
    }

    /// Sets the employer, leaving the status alone. A new work term starts not started
    pub async fn update_work_term_company(
        &self,
        user_id: &str,
        term_name: &str,
        company_name: &str,
        work_term_id: Option<Uuid>,
    ) -> Result<WorkTerm, EngineError> {
        let user_id = require_user(user_id)?;
        let create = NewWorkTerm {
            user_id: user_id.to_string(),
            term_name: term_name.to_string(),
            status: WorkTermStatus::NotStarted,
            company_name: Some(company_name.to_string()),
        };

        self.upsert(
            user_id,
            term_name,
            work_term_id,
            |_| WorkTermChange {
                status: None,
                company_name: Some(company_name.to_string()),
            },
            create,
        )
        .await
    }

    /// Oldest first
    pub async fn list_work_terms(&self, user_id: &str) -> Result<Vec<WorkTerm>, EngineError> {
        let user_id = require_user(user_id)?;
        self.repo.work_terms_for_user(user_id).await
    }

    pub async fn delete_work_term(
        &self,
        user_id: &str,
        work_term_id: Uuid,
    ) -> Result<Ack, EngineError> {
        let user_id = require_user(user_id)?;

        let removed = self.repo.delete_work_term(user_id, work_term_id).await?;
        if removed == 0 {
            return Err(EngineError::NotFound(
                "Work term not found or you do not have permission to delete it".to_string(),
            ));
        }

        info!("Deleted work term {} for user {}", work_term_id, user_id);
        Ok(Ack {})
    }
}
