//! Rental property repository.

use std::sync::Arc;

use crate::entities::{Property, property, property::ListingStatus};
use casaflow_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Query filters for property lists.
#[derive(Debug, Default, Clone)]
pub struct PropertyFilter {
    /// Restrict to one agency (tenant scope).
    pub agency_id: Option<String>,
    /// Restrict to one status.
    pub status: Option<ListingStatus>,
    /// Exact city match.
    pub city: Option<String>,
    /// Substring match on the title.
    pub search: Option<String>,
    /// Page size.
    pub limit: u64,
    /// Page offset.
    pub offset: u64,
}

/// Property repository for database operations.
#[derive(Clone)]
pub struct PropertyRepository {
    db: Arc<DatabaseConnection>,
}

impl PropertyRepository {
    /// Create a new property repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a property by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<property::Model>> {
        Property::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a property by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<property::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PropertyNotFound(id.to_string()))
    }

    /// Create a property.
    pub async fn create(&self, model: property::ActiveModel) -> AppResult<property::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a property.
    pub async fn update(&self, model: property::ActiveModel) -> AppResult<property::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a property.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if let Some(p) = self.find_by_id(id).await? {
            p.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// List properties matching the filter, newest first, with total count.
    pub async fn list(&self, filter: &PropertyFilter) -> AppResult<(Vec<property::Model>, u64)> {
        let mut query = Property::find();

        if let Some(agency_id) = &filter.agency_id {
            query = query.filter(property::Column::AgencyId.eq(agency_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(property::Column::Status.eq(status));
        }
        if let Some(city) = &filter.city {
            query = query.filter(property::Column::City.eq(city));
        }
        if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(property::Column::Title.contains(term))
                    .add(property::Column::District.contains(term)),
            );
        }

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let rows = query
            .order_by_desc(property::Column::CreatedAt)
            .offset(filter.offset)
            .limit(filter.limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((rows, total))
    }
}
