//! Agent repository.

use std::sync::Arc;

use crate::entities::{Agent, agent};
use casaflow_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};

/// Agent repository for database operations.
#[derive(Clone)]
pub struct AgentRepository {
    db: Arc<DatabaseConnection>,
}

impl AgentRepository {
    /// Create a new agent repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an agent by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<agent::Model>> {
        Agent::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an agent by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<agent::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::AgentNotFound(id.to_string()))
    }

    /// Find an agent by email (lowercased).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<agent::Model>> {
        Agent::find()
            .filter(agent::Column::Email.eq(email.to_lowercase()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new agent.
    pub async fn create(&self, model: agent::ActiveModel) -> AppResult<agent::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an agent.
    pub async fn update(&self, model: agent::ActiveModel) -> AppResult<agent::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard-delete an agent. The only hard delete in the system.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if let Some(agent) = self.find_by_id(id).await? {
            agent
                .delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// List agents belonging to an agency.
    pub async fn find_by_agency(&self, agency_id: &str) -> AppResult<Vec<agent::Model>> {
        Agent::find()
            .filter(agent::Column::AgencyId.eq(agency_id))
            .order_by_asc(agent::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
