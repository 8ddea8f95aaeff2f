//! Sales property repository.

use std::sync::Arc;

use crate::entities::{SalesProperty, sales_property, sales_property::SalesStatus};
use casaflow_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use super::PropertyFilter;

/// Sales property repository for database operations.
#[derive(Clone)]
pub struct SalesPropertyRepository {
    db: Arc<DatabaseConnection>,
}

impl SalesPropertyRepository {
    /// Create a new sales property repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a sales property by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<sales_property::Model>> {
        SalesProperty::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a sales property by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<sales_property::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PropertyNotFound(id.to_string()))
    }

    /// Create a sales property.
    pub async fn create(
        &self,
        model: sales_property::ActiveModel,
    ) -> AppResult<sales_property::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a sales property.
    pub async fn update(
        &self,
        model: sales_property::ActiveModel,
    ) -> AppResult<sales_property::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a sales property.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if let Some(p) = self.find_by_id(id).await? {
            p.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }

    /// List sales properties matching the filter, newest first, with total
    /// count. Status is filtered separately because sales listings have the
    /// extra `sold` state.
    pub async fn list(
        &self,
        filter: &PropertyFilter,
        status: Option<SalesStatus>,
    ) -> AppResult<(Vec<sales_property::Model>, u64)> {
        let mut query = SalesProperty::find();

        if let Some(agency_id) = &filter.agency_id {
            query = query.filter(sales_property::Column::AgencyId.eq(agency_id));
        }
        if let Some(status) = status {
            query = query.filter(sales_property::Column::Status.eq(status));
        }
        if let Some(city) = &filter.city {
            query = query.filter(sales_property::Column::City.eq(city));
        }
        if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(sales_property::Column::Title.contains(term))
                    .add(sales_property::Column::District.contains(term)),
            );
        }

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let rows = query
            .order_by_desc(sales_property::Column::CreatedAt)
            .offset(filter.offset)
            .limit(filter.limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((rows, total))
    }
}
