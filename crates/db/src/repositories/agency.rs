//! Agency repository.

use std::sync::Arc;

use crate::entities::{Agency, agency};
use casaflow_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait};

/// Agency repository for database operations.
#[derive(Clone)]
pub struct AgencyRepository {
    db: Arc<DatabaseConnection>,
}

impl AgencyRepository {
    /// Create a new agency repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an agency by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<agency::Model>> {
        Agency::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an agency by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<agency::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::AgencyNotFound(id.to_string()))
    }

    /// Create a new agency.
    pub async fn create(&self, model: agency::ActiveModel) -> AppResult<agency::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an agency.
    pub async fn update(&self, model: agency::ActiveModel) -> AppResult<agency::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
