//! Booking repository.
//!
//! Booking writes that touch more than one table (creation, cancellation,
//! payment, rescheduling) run inside a single transaction, and the
//! availability conflict check runs inside that same transaction so two
//! concurrent requests cannot both pass the check and double-book a window.

use std::sync::Arc;

use crate::entities::{
    Booking, Commission, booking, booking::BookingStatus, commission,
    commission::CommissionStatus, property, property_availability,
};
use crate::repositories::AvailabilityRepository;
use casaflow_common::{AppError, AppResult};
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// A booking plus the rows created alongside it.
pub struct NewBooking {
    /// Booking row to insert.
    pub booking: booking::ActiveModel,
    /// Commission row to insert (its `booking_id` must match).
    pub commission: commission::ActiveModel,
    /// Availability block to insert (its `booking_id` must match).
    pub availability: property_availability::ActiveModel,
    /// Property the window is checked against.
    pub property_id: String,
    /// Inclusive start of the requested window.
    pub check_in: NaiveDate,
    /// Exclusive end of the requested window.
    pub check_out: NaiveDate,
}

/// Query filters for the booking list.
#[derive(Debug, Default, Clone)]
pub struct BookingFilter {
    /// Restrict to one agency (tenant scope), joined through the property.
    pub agency_id: Option<String>,
    /// Restrict to one status.
    pub status: Option<BookingStatus>,
    /// Bookings checking in on or after this date.
    pub start_date: Option<NaiveDate>,
    /// Bookings checking in on or before this date.
    pub end_date: Option<NaiveDate>,
    /// Substring match on client name or email.
    pub search: Option<String>,
    /// Page size.
    pub limit: u64,
    /// Page offset.
    pub offset: u64,
}

/// Aggregate booking counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingStats {
    pub total: u64,
    pub pending: u64,
    pub confirmed: u64,
    pub paid: u64,
    pub cancellation_requested: u64,
    pub cancelled: u64,
    pub archived: u64,
    /// Sum of `total_amount` over paid bookings, in cents.
    pub total_revenue: i64,
}

/// Booking repository for database operations.
#[derive(Clone)]
pub struct BookingRepository {
    db: Arc<DatabaseConnection>,
}

impl BookingRepository {
    /// Create a new booking repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a booking by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<booking::Model>> {
        Booking::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a booking by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<booking::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::BookingNotFound(id.to_string()))
    }

    /// Find a booking together with its commission.
    pub async fn find_with_commission(
        &self,
        id: &str,
    ) -> AppResult<Option<(booking::Model, Option<commission::Model>)>> {
        Booking::find_by_id(id)
            .find_also_related(Commission)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Atomically create a booking, its commission, and its availability
    /// block, re-checking the window inside the transaction.
    pub async fn create_booked(
        &self,
        new: NewBooking,
    ) -> AppResult<(booking::Model, commission::Model)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if AvailabilityRepository::has_conflict(
            &txn,
            &new.property_id,
            new.check_in,
            new.check_out,
            None,
        )
        .await?
        {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::BadRequest(
                "Requested dates are not available for this property".to_string(),
            ));
        }

        let booking = new
            .booking
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let commission = new
            .commission
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        new.availability
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((booking, commission))
    }

    /// List bookings matching the filter, newest first, with the total count.
    pub async fn list(&self, filter: &BookingFilter) -> AppResult<(Vec<booking::Model>, u64)> {
        let mut query = Booking::find();

        if let Some(agency_id) = &filter.agency_id {
            query = query
                .inner_join(crate::entities::Property)
                .filter(property::Column::AgencyId.eq(agency_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(booking::Column::Status.eq(status));
        }
        if let Some(start) = filter.start_date {
            query = query.filter(booking::Column::CheckIn.gte(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(booking::Column::CheckIn.lte(end));
        }
        if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(booking::Column::ClientName.contains(term))
                    .add(booking::Column::ClientEmail.contains(term)),
            );
        }

        let total = query
            .clone()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let rows = query
            .order_by_desc(booking::Column::CreatedAt)
            .offset(filter.offset)
            .limit(filter.limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((rows, total))
    }

    /// Bookings where the agent is either the owner or the booking agent.
    pub async fn find_by_agent(&self, agent_id: &str) -> AppResult<Vec<booking::Model>> {
        Booking::find()
            .filter(
                Condition::any()
                    .add(booking::Column::OwnerAgentId.eq(agent_id))
                    .add(booking::Column::BookingAgentId.eq(agent_id)),
            )
            .order_by_desc(booking::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Bookings across all of an agency's properties.
    pub async fn find_by_agency(&self, agency_id: &str) -> AppResult<Vec<booking::Model>> {
        Booking::find()
            .inner_join(crate::entities::Property)
            .filter(property::Column::AgencyId.eq(agency_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a booking.
    pub async fn update(&self, model: booking::ActiveModel) -> AppResult<booking::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Status-only transition (confirmed, cancellation requested, archived).
    pub async fn set_status(
        &self,
        id: &str,
        status: BookingStatus,
        notes: Option<String>,
    ) -> AppResult<booking::Model> {
        let booking = self.get_by_id(id).await?;
        let mut model: booking::ActiveModel = booking.into();
        model.status = Set(status);
        if let Some(notes) = notes {
            model.notes = Set(Some(notes));
        }
        model.updated_at = Set(Utc::now().into());
        self.update(model).await
    }

    /// Cancel a booking and release every availability row it blocked.
    pub async fn cancel(&self, id: &str, notes: Option<String>) -> AppResult<booking::Model> {
        let booking = self.get_by_id(id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut model: booking::ActiveModel = booking.into();
        model.status = Set(BookingStatus::Cancelled);
        if let Some(notes) = notes {
            model.notes = Set(Some(notes));
        }
        model.updated_at = Set(Utc::now().into());
        let booking = model
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        crate::entities::PropertyAvailability::update_many()
            .col_expr(property_availability::Column::IsAvailable, Expr::value(true))
            .col_expr(
                property_availability::Column::BookingId,
                Expr::value(Option::<String>::None),
            )
            .col_expr(
                property_availability::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(property_availability::Column::BookingId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(booking)
    }

    /// Mark a booking paid together with its commission.
    pub async fn mark_paid(&self, id: &str) -> AppResult<booking::Model> {
        let booking = self.get_by_id(id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut model: booking::ActiveModel = booking.into();
        model.status = Set(BookingStatus::Paid);
        model.updated_at = Set(Utc::now().into());
        let booking = model
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Commission::update_many()
            .col_expr(
                commission::Column::Status,
                Expr::value(CommissionStatus::Paid),
            )
            .col_expr(commission::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(commission::Column::BookingId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(booking)
    }

    /// Move a booking to a new window, re-checking availability (excluding
    /// the booking's own block) and rewriting the block, atomically.
    pub async fn reschedule(
        &self,
        id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
        duration: String,
    ) -> AppResult<booking::Model> {
        let booking = self.get_by_id(id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if AvailabilityRepository::has_conflict(
            &txn,
            &booking.property_id,
            check_in,
            check_out,
            Some(id),
        )
        .await?
        {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(AppError::BadRequest(
                "Requested dates are not available for this property".to_string(),
            ));
        }

        let mut model: booking::ActiveModel = booking.into();
        model.check_in = Set(check_in);
        model.check_out = Set(check_out);
        model.duration = Set(duration);
        model.updated_at = Set(Utc::now().into());
        let booking = model
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        crate::entities::PropertyAvailability::update_many()
            .col_expr(
                property_availability::Column::StartDate,
                Expr::value(check_in),
            )
            .col_expr(
                property_availability::Column::EndDate,
                Expr::value(check_out),
            )
            .col_expr(
                property_availability::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(property_availability::Column::BookingId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(booking)
    }

    /// Aggregate counters for one agency's bookings dashboard.
    pub async fn stats(&self, agency_id: &str) -> AppResult<BookingStats> {
        let scoped = || {
            Booking::find()
                .inner_join(crate::entities::Property)
                .filter(property::Column::AgencyId.eq(agency_id))
        };
        let count_status = |status: BookingStatus| {
            scoped()
                .filter(booking::Column::Status.eq(status))
                .count(self.db.as_ref())
        };

        let total = scoped()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let pending = count_status(BookingStatus::Pending)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let confirmed = count_status(BookingStatus::Confirmed)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let paid = count_status(BookingStatus::Paid)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let cancellation_requested = count_status(BookingStatus::CancellationRequested)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let cancelled = count_status(BookingStatus::Cancelled)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let archived = count_status(BookingStatus::Archived)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // SUM(bigint) is NUMERIC in Postgres; cast back for decoding
        let total_revenue: Option<i64> = scoped()
            .select_only()
            .column_as(
                Expr::expr(booking::Column::TotalAmount.sum()).cast_as(Alias::new("BIGINT")),
                "revenue",
            )
            .filter(booking::Column::Status.eq(BookingStatus::Paid))
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .flatten();

        Ok(BookingStats {
            total,
            pending,
            confirmed,
            paid,
            cancellation_requested,
            cancelled,
            archived,
            total_revenue: total_revenue.unwrap_or(0),
        })
    }
}
