//! Booking lifecycle: creation, status transitions, rescheduling.

use chrono::{NaiveDate, Utc};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use casaflow_common::config::CommissionConfig;
use casaflow_common::{AppError, AppResult, id::IdGenerator};
use casaflow_db::entities::booking::BookingStatus;
use casaflow_db::entities::commission::CommissionStatus;
use casaflow_db::entities::property::ListingStatus;
use casaflow_db::entities::{agent, booking, commission, property_availability};
use casaflow_db::repositories::{
    AgentRepository, BookingFilter, BookingRepository, BookingStats, NewBooking,
    PropertyRepository,
};

use crate::commission::rental_split;

/// Nights per month for the duration label.
const NIGHTS_PER_MONTH: i64 = 30;

/// Input for creating a booking.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingInput {
    pub property_id: String,
    /// Agent representing the owner. Defaults to the agent on the listing.
    pub owner_agent_id: Option<String>,
    /// Agent who brought the client. Defaults to the owner agent.
    pub booking_agent_id: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub client_name: String,
    #[validate(email)]
    pub client_email: String,
    #[validate(length(max = 32))]
    pub client_phone: Option<String>,
    /// Inclusive check-in date.
    pub check_in: NaiveDate,
    /// Exclusive check-out date.
    pub check_out: NaiveDate,
    /// Total booking amount in cents.
    #[validate(range(min = 1))]
    pub total_amount: i64,
    #[validate(length(max = 4096))]
    pub notes: Option<String>,
}

/// Input for a status transition.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusInput {
    pub status: BookingStatus,
    #[validate(length(max = 4096))]
    pub notes: Option<String>,
}

/// Input for moving a booking to new dates.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleBookingInput {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

/// Whether a booking may move from `from` to `to`.
///
/// Terminal states (`cancelled`, `archived`) allow nothing. A paid booking
/// can only be archived; a cancellation request can be resolved by
/// confirming or cancelling.
#[must_use]
pub fn transition_allowed(from: BookingStatus, to: BookingStatus) -> bool {
    use BookingStatus::{
        Archived, CancellationRequested, Cancelled, Confirmed, Paid, Pending,
    };

    match from {
        Pending => matches!(to, Confirmed | CancellationRequested | Cancelled | Archived),
        Confirmed => matches!(to, Paid | CancellationRequested | Cancelled | Archived),
        CancellationRequested => matches!(to, Cancelled | Confirmed | Archived),
        Paid => matches!(to, Archived),
        Cancelled | Archived => false,
    }
}

/// Human-readable stay length. Whole multiples of 30 nights read as months.
#[must_use]
pub fn duration_label(check_in: NaiveDate, check_out: NaiveDate) -> String {
    let nights = (check_out - check_in).num_days();

    if nights > 0 && nights % NIGHTS_PER_MONTH == 0 {
        let months = nights / NIGHTS_PER_MONTH;
        if months == 1 {
            "1 month".to_string()
        } else {
            format!("{months} months")
        }
    } else if nights == 1 {
        "1 night".to_string()
    } else {
        format!("{nights} nights")
    }
}

/// Service for bookings.
#[derive(Clone)]
pub struct BookingService {
    booking_repo: BookingRepository,
    property_repo: PropertyRepository,
    agent_repo: AgentRepository,
    commission: CommissionConfig,
    id_gen: IdGenerator,
}

impl BookingService {
    /// Create a new booking service.
    #[must_use]
    pub const fn new(
        booking_repo: BookingRepository,
        property_repo: PropertyRepository,
        agent_repo: AgentRepository,
        commission: CommissionConfig,
    ) -> Self {
        Self {
            booking_repo,
            property_repo,
            agent_repo,
            commission,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a booking, checking its property belongs to the agent's agency.
    pub async fn get_for_agent(
        &self,
        agent: &agent::Model,
        id: &str,
    ) -> AppResult<booking::Model> {
        let booking = self.booking_repo.get_by_id(id).await?;
        let property = self.property_repo.get_by_id(&booking.property_id).await?;
        if agent.agency_id.as_deref() != Some(property.agency_id.as_str()) {
            return Err(AppError::Forbidden(
                "Booking belongs to a different agency".to_string(),
            ));
        }
        Ok(booking)
    }

    /// Get a booking together with its commission.
    pub async fn get_with_commission(
        &self,
        agent: &agent::Model,
        id: &str,
    ) -> AppResult<(booking::Model, Option<commission::Model>)> {
        self.get_for_agent(agent, id).await?;
        self.booking_repo
            .find_with_commission(id)
            .await?
            .ok_or_else(|| AppError::BookingNotFound(id.to_string()))
    }

    /// List the agent's agency's bookings matching the filter.
    pub async fn list(
        &self,
        agent: &agent::Model,
        mut filter: BookingFilter,
    ) -> AppResult<(Vec<booking::Model>, u64)> {
        filter.agency_id = Some(require_agency(agent)?.to_string());
        self.booking_repo.list(&filter).await
    }

    /// Bookings where the agent is owner or booking agent.
    pub async fn list_for_agent(&self, agent_id: &str) -> AppResult<Vec<booking::Model>> {
        self.booking_repo.find_by_agent(agent_id).await
    }

    /// Bookings across an agency's properties.
    pub async fn list_for_agency(&self, agency_id: &str) -> AppResult<Vec<booking::Model>> {
        self.booking_repo.find_by_agency(agency_id).await
    }

    /// Dashboard counters for the agent's agency.
    pub async fn stats(&self, agent: &agent::Model) -> AppResult<BookingStats> {
        self.booking_repo.stats(require_agency(agent)?).await
    }

    /// Create a booking.
    ///
    /// Splits the commission up front: `rate`% of the total is the
    /// commission, the platform keeps 20% of it, and the rest goes 70/30 to
    /// the owner and booking agents. The dates are blocked in the same
    /// transaction that inserts the booking.
    pub async fn create(
        &self,
        agent: &agent::Model,
        input: CreateBookingInput,
    ) -> AppResult<(booking::Model, commission::Model)> {
        input.validate()?;

        if input.check_out <= input.check_in {
            return Err(AppError::Validation(
                "Check-out must be after check-in".to_string(),
            ));
        }

        let property = self.property_repo.get_by_id(&input.property_id).await?;
        if agent.agency_id.as_deref() != Some(property.agency_id.as_str()) {
            return Err(AppError::Forbidden(
                "Listing belongs to a different agency".to_string(),
            ));
        }
        if property.status == ListingStatus::Archived {
            return Err(AppError::BadRequest(
                "Archived listings cannot be booked".to_string(),
            ));
        }

        let owner_agent_id = match input.owner_agent_id {
            Some(owner_id) if owner_id != property.agent_id => {
                let owner = self.agent_repo.get_by_id(&owner_id).await?;
                if owner.agency_id.as_deref() != Some(property.agency_id.as_str()) {
                    return Err(AppError::BadRequest(
                        "Owner agent belongs to a different agency".to_string(),
                    ));
                }
                owner_id
            }
            _ => property.agent_id.clone(),
        };
        let booking_agent_id = match input.booking_agent_id {
            Some(other_id) if other_id != owner_agent_id => {
                let other = self.agent_repo.get_by_id(&other_id).await?;
                if other.agency_id.as_deref() != Some(property.agency_id.as_str()) {
                    return Err(AppError::BadRequest(
                        "Booking agent belongs to a different agency".to_string(),
                    ));
                }
                other_id
            }
            Some(other_id) => other_id,
            None => owner_agent_id.clone(),
        };

        let split = rental_split(input.total_amount, self.commission.rental_rate);
        let duration = duration_label(input.check_in, input.check_out);

        let booking_id = self.id_gen.generate();
        let now = Utc::now();

        self.booking_repo
            .create_booked(NewBooking {
                booking: booking::ActiveModel {
                    id: Set(booking_id.clone()),
                    property_id: Set(property.id.clone()),
                    owner_agent_id: Set(owner_agent_id),
                    booking_agent_id: Set(booking_agent_id),
                    client_name: Set(input.client_name),
                    client_email: Set(input.client_email.to_lowercase()),
                    client_phone: Set(input.client_phone),
                    check_in: Set(input.check_in),
                    check_out: Set(input.check_out),
                    duration: Set(duration),
                    total_amount: Set(input.total_amount),
                    notes: Set(input.notes),
                    status: Set(BookingStatus::Pending),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                },
                commission: commission::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    booking_id: Set(booking_id.clone()),
                    amount: Set(split.amount),
                    owner_commission: Set(split.owner_commission),
                    booking_commission: Set(split.booking_commission),
                    platform_fee: Set(split.platform_fee),
                    rate: Set(self.commission.rental_rate),
                    status: Set(CommissionStatus::Pending),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                },
                availability: property_availability::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    property_id: Set(property.id.clone()),
                    start_date: Set(input.check_in),
                    end_date: Set(input.check_out),
                    is_available: Set(false),
                    booking_id: Set(Some(booking_id)),
                    note: Set(None),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                },
                property_id: property.id,
                check_in: input.check_in,
                check_out: input.check_out,
            })
            .await
    }

    /// Apply a status transition.
    ///
    /// Cancelling releases the blocked dates; marking paid also marks the
    /// commission paid. Both run atomically with the status change.
    pub async fn update_status(
        &self,
        agent: &agent::Model,
        id: &str,
        input: UpdateBookingStatusInput,
    ) -> AppResult<booking::Model> {
        input.validate()?;
        let booking = self.get_for_agent(agent, id).await?;

        if !transition_allowed(booking.status, input.status) {
            return Err(AppError::BadRequest(format!(
                "Cannot move a {} booking to {}",
                status_name(booking.status),
                status_name(input.status),
            )));
        }

        match input.status {
            BookingStatus::Cancelled => self.booking_repo.cancel(id, input.notes).await,
            BookingStatus::Paid => self.booking_repo.mark_paid(id).await,
            status => self.booking_repo.set_status(id, status, input.notes).await,
        }
    }

    /// Move a booking to new dates. Only pending and confirmed bookings can
    /// be rescheduled.
    pub async fn reschedule(
        &self,
        agent: &agent::Model,
        id: &str,
        input: RescheduleBookingInput,
    ) -> AppResult<booking::Model> {
        if input.check_out <= input.check_in {
            return Err(AppError::Validation(
                "Check-out must be after check-in".to_string(),
            ));
        }

        let booking = self.get_for_agent(agent, id).await?;
        if !matches!(
            booking.status,
            BookingStatus::Pending | BookingStatus::Confirmed
        ) {
            return Err(AppError::BadRequest(format!(
                "A {} booking cannot be rescheduled",
                status_name(booking.status),
            )));
        }

        let duration = duration_label(input.check_in, input.check_out);
        self.booking_repo
            .reschedule(id, input.check_in, input.check_out, duration)
            .await
    }
}

fn require_agency(agent: &agent::Model) -> AppResult<&str> {
    agent
        .agency_id
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("Agent has no agency".to_string()))
}

const fn status_name(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "pending",
        BookingStatus::Confirmed => "confirmed",
        BookingStatus::Paid => "paid",
        BookingStatus::CancellationRequested => "cancellation_requested",
        BookingStatus::Cancelled => "cancelled",
        BookingStatus::Archived => "archived",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_duration_in_nights() {
        assert_eq!(duration_label(date(2026, 3, 1), date(2026, 3, 2)), "1 night");
        assert_eq!(duration_label(date(2026, 3, 1), date(2026, 3, 5)), "4 nights");
        assert_eq!(
            duration_label(date(2026, 3, 1), date(2026, 3, 30)),
            "29 nights"
        );
    }

    #[test]
    fn test_duration_in_months() {
        assert_eq!(duration_label(date(2026, 3, 1), date(2026, 3, 31)), "1 month");
        assert_eq!(
            duration_label(date(2026, 3, 1), date(2026, 4, 30)),
            "2 months"
        );
        assert_eq!(
            duration_label(date(2026, 1, 1), date(2026, 6, 30)),
            "6 months"
        );
    }

    #[test]
    fn test_transitions_from_pending() {
        use BookingStatus::*;
        assert!(transition_allowed(Pending, Confirmed));
        assert!(transition_allowed(Pending, Cancelled));
        assert!(transition_allowed(Pending, CancellationRequested));
        assert!(transition_allowed(Pending, Archived));
        assert!(!transition_allowed(Pending, Paid));
    }

    #[test]
    fn test_transitions_from_confirmed() {
        use BookingStatus::*;
        assert!(transition_allowed(Confirmed, Paid));
        assert!(transition_allowed(Confirmed, CancellationRequested));
        assert!(!transition_allowed(Confirmed, Pending));
    }

    #[test]
    fn test_cancellation_request_resolution() {
        use BookingStatus::*;
        assert!(transition_allowed(CancellationRequested, Cancelled));
        assert!(transition_allowed(CancellationRequested, Confirmed));
        assert!(!transition_allowed(CancellationRequested, Paid));
    }

    #[test]
    fn test_terminal_states_allow_nothing() {
        use BookingStatus::*;
        for to in [Pending, Confirmed, Paid, CancellationRequested, Cancelled, Archived] {
            assert!(!transition_allowed(Cancelled, to));
            assert!(!transition_allowed(Archived, to));
        }
    }

    #[test]
    fn test_paid_can_only_archive() {
        use BookingStatus::*;
        assert!(transition_allowed(Paid, Archived));
        assert!(!transition_allowed(Paid, Cancelled));
        assert!(!transition_allowed(Paid, Confirmed));
    }
}
