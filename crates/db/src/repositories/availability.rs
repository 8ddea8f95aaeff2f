//! Property availability repository.

use std::sync::Arc;

use crate::entities::{PropertyAvailability, property_availability};
use casaflow_common::{AppError, AppResult};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

/// Availability repository for database operations.
#[derive(Clone)]
pub struct AvailabilityRepository {
    db: Arc<DatabaseConnection>,
}

impl AvailabilityRepository {
    /// Create a new availability repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// The shared connection, for running [`Self::has_conflict`] outside a
    /// transaction.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// Check whether `[start, end)` intersects a blocked range for the
    /// property, optionally ignoring rows belonging to one booking.
    ///
    /// Generic over the connection so the same check runs on the pool and
    /// inside the booking-creation transaction.
    pub async fn has_conflict<C: ConnectionTrait>(
        conn: &C,
        property_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        exclude_booking_id: Option<&str>,
    ) -> AppResult<bool> {
        let mut query = PropertyAvailability::find()
            .filter(property_availability::Column::PropertyId.eq(property_id))
            .filter(property_availability::Column::IsAvailable.eq(false))
            // Half-open ranges: [start, end) overlaps [s, e) iff s < end && e > start
            .filter(property_availability::Column::StartDate.lt(end))
            .filter(property_availability::Column::EndDate.gt(start));

        if let Some(booking_id) = exclude_booking_id {
            query = query.filter(
                property_availability::Column::BookingId
                    .ne(booking_id)
                    .or(property_availability::Column::BookingId.is_null()),
            );
        }

        let count = query
            .count(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(count > 0)
    }

    /// Find an availability row by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<property_availability::Model>> {
        PropertyAvailability::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List availability rows for a property, earliest first.
    pub async fn find_by_property(
        &self,
        property_id: &str,
    ) -> AppResult<Vec<property_availability::Model>> {
        PropertyAvailability::find()
            .filter(property_availability::Column::PropertyId.eq(property_id))
            .order_by_asc(property_availability::Column::StartDate)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create an availability row (manual block or booking block).
    pub async fn create(
        &self,
        model: property_availability::ActiveModel,
    ) -> AppResult<property_availability::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an availability row.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if let Some(row) = self.find_by_id(id).await? {
            row.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}
