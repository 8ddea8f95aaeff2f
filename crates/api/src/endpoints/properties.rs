//! Rental property endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use casaflow_common::{AppError, AppResult};
use casaflow_core::{BlockDatesInput, CreatePropertyInput, UpdatePropertyInput};
use casaflow_db::entities::property::ListingStatus;
use casaflow_db::entities::{property, property_availability};
use casaflow_db::repositories::PropertyFilter;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::AuthAgent,
    middleware::AppState,
    response::{ApiResponse, Paged},
};

/// Property response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResponse {
    pub id: String,
    pub agency_id: String,
    pub agent_id: String,
    pub title: String,
    pub description: Option<String>,
    pub city: String,
    pub district: Option<String>,
    pub address: Option<String>,
    pub price_per_night: Option<i64>,
    pub price_per_month: Option<i64>,
    pub bedrooms: i16,
    pub bathrooms: i16,
    pub area_sqm: Option<i32>,
    pub amenities: serde_json::Value,
    pub media_keys: serde_json::Value,
    pub status: ListingStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<property::Model> for PropertyResponse {
    fn from(p: property::Model) -> Self {
        Self {
            id: p.id,
            agency_id: p.agency_id,
            agent_id: p.agent_id,
            title: p.title,
            description: p.description,
            city: p.city,
            district: p.district,
            address: p.address,
            price_per_night: p.price_per_night,
            price_per_month: p.price_per_month,
            bedrooms: p.bedrooms,
            bathrooms: p.bathrooms,
            area_sqm: p.area_sqm,
            amenities: p.amenities,
            media_keys: p.media_keys,
            status: p.status,
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}

/// Availability row response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub id: String,
    pub property_id: String,
    pub start_date: String,
    pub end_date: String,
    pub is_available: bool,
    pub booking_id: Option<String>,
    pub note: Option<String>,
}

impl From<property_availability::Model> for AvailabilityResponse {
    fn from(a: property_availability::Model) -> Self {
        Self {
            id: a.id,
            property_id: a.property_id,
            start_date: a.start_date.to_string(),
            end_date: a.end_date.to_string(),
            is_available: a.is_available,
            booking_id: a.booking_id,
            note: a.note,
        }
    }
}

/// List query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPropertiesQuery {
    pub status: Option<ListingStatus>,
    pub city: Option<String>,
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

fn agency_id(agent: &casaflow_db::entities::agent::Model) -> AppResult<String> {
    agent
        .agency_id
        .clone()
        .ok_or_else(|| AppError::BadRequest("Agent has no agency".to_string()))
}

/// List the agency's listings.
async fn list(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Query(query): Query<ListPropertiesQuery>,
) -> AppResult<ApiResponse<Paged<PropertyResponse>>> {
    let filter = PropertyFilter {
        agency_id: Some(agency_id(&agent)?),
        status: query.status,
        city: query.city,
        search: query.search,
        limit: query.limit.min(100),
        offset: query.offset,
    };
    let (rows, total) = state.property_service.list(&filter).await?;

    Ok(ApiResponse::ok(Paged {
        items: rows.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Create a draft listing.
async fn create(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Json(input): Json<CreatePropertyInput>,
) -> AppResult<ApiResponse<PropertyResponse>> {
    info!(agent_id = %agent.id, "Creating listing");

    let property = state.property_service.create(&agent, input).await?;

    Ok(ApiResponse::ok(property.into()))
}

/// Get a listing.
async fn show(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PropertyResponse>> {
    let property = state.property_service.get_for_agent(&agent, &id).await?;

    Ok(ApiResponse::ok(property.into()))
}

/// Update a listing.
async fn update(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePropertyInput>,
) -> AppResult<ApiResponse<PropertyResponse>> {
    let property = state.property_service.update(&agent, &id, input).await?;

    Ok(ApiResponse::ok(property.into()))
}

/// Delete a draft listing.
async fn remove(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    info!(agent_id = %agent.id, property_id = %id, "Deleting listing");

    state.property_service.delete(&agent, &id).await?;

    Ok(crate::response::ok())
}

/// Publish a listing.
async fn publish(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PropertyResponse>> {
    info!(agent_id = %agent.id, property_id = %id, "Publishing listing");

    let property = state.property_service.publish(&agent, &id).await?;

    Ok(ApiResponse::ok(property.into()))
}

/// Archive a listing.
async fn archive(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<PropertyResponse>> {
    info!(agent_id = %agent.id, property_id = %id, "Archiving listing");

    let property = state.property_service.archive(&agent, &id).await?;

    Ok(ApiResponse::ok(property.into()))
}

/// List a listing's availability rows.
async fn availability(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<AvailabilityResponse>>> {
    let rows = state.property_service.availability(&agent, &id).await?;

    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// Manually block a date range.
async fn block(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<BlockDatesInput>,
) -> AppResult<ApiResponse<AvailabilityResponse>> {
    info!(agent_id = %agent.id, property_id = %id, "Blocking dates");

    let row = state.property_service.block_dates(&agent, &id, input).await?;

    Ok(ApiResponse::ok(row.into()))
}

/// Remove a manual block.
async fn unblock(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path((id, block_id)): Path<(String, String)>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.property_service.unblock(&agent, &id, &block_id).await?;

    Ok(crate::response::ok())
}

/// Create the properties router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).patch(update).delete(remove))
        .route("/{id}/publish", post(publish))
        .route("/{id}/archive", post(archive))
        .route("/{id}/availability", get(availability).post(block))
        .route(
            "/{id}/availability/{block_id}",
            axum::routing::delete(unblock),
        )
}
