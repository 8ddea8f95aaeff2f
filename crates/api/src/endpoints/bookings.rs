//! Booking endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use casaflow_common::{AppError, AppResult};
use casaflow_core::{CreateBookingInput, RescheduleBookingInput, UpdateBookingStatusInput};
use casaflow_db::entities::booking::BookingStatus;
use casaflow_db::entities::commission::CommissionStatus;
use casaflow_db::entities::{booking, commission};
use casaflow_db::repositories::{BookingFilter, BookingStats};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::AuthAgent,
    middleware::AppState,
    response::{ApiResponse, Paged},
};

/// Booking response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,
    pub property_id: String,
    pub owner_agent_id: String,
    pub booking_agent_id: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub check_in: String,
    pub check_out: String,
    pub duration: String,
    pub total_amount: i64,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<booking::Model> for BookingResponse {
    fn from(b: booking::Model) -> Self {
        Self {
            id: b.id,
            property_id: b.property_id,
            owner_agent_id: b.owner_agent_id,
            booking_agent_id: b.booking_agent_id,
            client_name: b.client_name,
            client_email: b.client_email,
            client_phone: b.client_phone,
            check_in: b.check_in.to_string(),
            check_out: b.check_out.to_string(),
            duration: b.duration,
            total_amount: b.total_amount,
            notes: b.notes,
            status: b.status,
            created_at: b.created_at.to_rfc3339(),
            updated_at: b.updated_at.to_rfc3339(),
        }
    }
}

/// Commission response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionResponse {
    pub id: String,
    pub booking_id: String,
    pub amount: i64,
    pub owner_commission: i64,
    pub booking_commission: i64,
    pub platform_fee: i64,
    pub rate: f64,
    pub status: CommissionStatus,
}

impl From<commission::Model> for CommissionResponse {
    fn from(c: commission::Model) -> Self {
        Self {
            id: c.id,
            booking_id: c.booking_id,
            amount: c.amount,
            owner_commission: c.owner_commission,
            booking_commission: c.booking_commission,
            platform_fee: c.platform_fee,
            rate: c.rate,
            status: c.status,
        }
    }
}

/// A booking with its commission.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetailResponse {
    #[serde(flatten)]
    pub booking: BookingResponse,
    pub commission: Option<CommissionResponse>,
}

/// Dashboard counters.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingStatsResponse {
    pub total: u64,
    pub pending: u64,
    pub confirmed: u64,
    pub paid: u64,
    pub cancellation_requested: u64,
    pub cancelled: u64,
    pub archived: u64,
    pub total_revenue: i64,
}

impl From<BookingStats> for BookingStatsResponse {
    fn from(s: BookingStats) -> Self {
        Self {
            total: s.total,
            pending: s.pending,
            confirmed: s.confirmed,
            paid: s.paid,
            cancellation_requested: s.cancellation_requested,
            cancelled: s.cancelled,
            archived: s.archived,
            total_revenue: s.total_revenue,
        }
    }
}

/// List query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBookingsQuery {
    pub status: Option<BookingStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

/// List the agency's bookings.
async fn list(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> AppResult<ApiResponse<Paged<BookingResponse>>> {
    let filter = BookingFilter {
        agency_id: None,
        status: query.status,
        start_date: query.start_date,
        end_date: query.end_date,
        search: query.search,
        limit: query.limit.min(100),
        offset: query.offset,
    };
    let (rows, total) = state.booking_service.list(&agent, filter).await?;

    Ok(ApiResponse::ok(Paged {
        items: rows.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Create a booking.
async fn create(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Json(input): Json<CreateBookingInput>,
) -> AppResult<ApiResponse<BookingDetailResponse>> {
    info!(agent_id = %agent.id, property_id = %input.property_id, "Creating booking");

    let (booking, commission) = state.booking_service.create(&agent, input).await?;

    Ok(ApiResponse::ok(BookingDetailResponse {
        booking: booking.into(),
        commission: Some(commission.into()),
    }))
}

/// Bookings where the caller is owner or booking agent.
async fn mine(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<BookingResponse>>> {
    let rows = state.booking_service.list_for_agent(&agent.id).await?;

    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// Bookings where a colleague is owner or booking agent.
async fn by_agent(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> AppResult<ApiResponse<Vec<BookingResponse>>> {
    let target = state.agent_service.get(&agent_id).await?;
    if target.agency_id != agent.agency_id {
        return Err(AppError::Forbidden(
            "Agent belongs to a different agency".to_string(),
        ));
    }
    let rows = state.booking_service.list_for_agent(&agent_id).await?;

    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// Bookings across all of an agency's properties.
async fn by_agency(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(agency_id): Path<String>,
) -> AppResult<ApiResponse<Vec<BookingResponse>>> {
    if agent.agency_id.as_deref() != Some(agency_id.as_str()) {
        return Err(AppError::Forbidden(
            "Bookings belong to a different agency".to_string(),
        ));
    }
    let rows = state.booking_service.list_for_agency(&agency_id).await?;

    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// Dashboard counters for the agency.
async fn stats(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<BookingStatsResponse>> {
    let stats = state.booking_service.stats(&agent).await?;

    Ok(ApiResponse::ok(stats.into()))
}

/// Get a booking with its commission.
async fn show(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<BookingDetailResponse>> {
    let (booking, commission) = state
        .booking_service
        .get_with_commission(&agent, &id)
        .await?;

    Ok(ApiResponse::ok(BookingDetailResponse {
        booking: booking.into(),
        commission: commission.map(Into::into),
    }))
}

/// Apply a status transition.
async fn update_status(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateBookingStatusInput>,
) -> AppResult<ApiResponse<BookingResponse>> {
    info!(agent_id = %agent.id, booking_id = %id, status = ?input.status, "Updating booking status");

    let booking = state
        .booking_service
        .update_status(&agent, &id, input)
        .await?;

    Ok(ApiResponse::ok(booking.into()))
}

/// Move a booking to new dates.
async fn reschedule(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RescheduleBookingInput>,
) -> AppResult<ApiResponse<BookingResponse>> {
    info!(agent_id = %agent.id, booking_id = %id, "Rescheduling booking");

    let booking = state.booking_service.reschedule(&agent, &id, input).await?;

    Ok(ApiResponse::ok(booking.into()))
}

/// Create the bookings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/mine", get(mine))
        .route("/agent/{agent_id}", get(by_agent))
        .route("/agency/{agency_id}", get(by_agency))
        .route("/stats", get(stats))
        .route("/{id}", get(show))
        .route("/{id}/status", patch(update_status))
        .route("/{id}/dates", patch(reschedule))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_detail_response_flattens_booking() {
        let detail = BookingDetailResponse {
            booking: BookingResponse {
                id: "b1".to_string(),
                property_id: "p1".to_string(),
                owner_agent_id: "a1".to_string(),
                booking_agent_id: "a2".to_string(),
                client_name: "Dana Client".to_string(),
                client_email: "dana@example.com".to_string(),
                client_phone: None,
                check_in: "2026-09-01".to_string(),
                check_out: "2026-09-05".to_string(),
                duration: "4 nights".to_string(),
                total_amount: 100_000,
                notes: None,
                status: BookingStatus::Pending,
                created_at: "2026-08-01T00:00:00+00:00".to_string(),
                updated_at: "2026-08-01T00:00:00+00:00".to_string(),
            },
            commission: Some(CommissionResponse {
                id: "c1".to_string(),
                booking_id: "b1".to_string(),
                amount: 10_000,
                owner_commission: 5_600,
                booking_commission: 2_400,
                platform_fee: 2_000,
                rate: 10.0,
                status: CommissionStatus::Pending,
            }),
        };

        let json = serde_json::to_string(&detail).unwrap();
        assert!(json.contains("\"clientName\":\"Dana Client\""));
        assert!(json.contains("\"ownerCommission\":5600"));
        assert!(json.contains("\"status\":\"pending\""));
    }

    #[test]
    fn test_list_query_defaults() {
        let query: ListBookingsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 0);
        assert!(query.status.is_none());
    }
}
