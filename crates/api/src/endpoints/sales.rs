//! Sales property endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use casaflow_common::{AppError, AppResult};
use casaflow_core::{CloseSaleInput, CreateSalesPropertyInput, UpdateSalesPropertyInput};
use casaflow_db::entities::commission::CommissionStatus;
use casaflow_db::entities::sales_property::SalesStatus;
use casaflow_db::entities::{sales_commission, sales_property, sales_transaction};
use casaflow_db::repositories::PropertyFilter;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::AuthAgent,
    middleware::AppState,
    response::{ApiResponse, Paged},
};

/// Sales property response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesPropertyResponse {
    pub id: String,
    pub agency_id: String,
    pub agent_id: String,
    pub title: String,
    pub description: Option<String>,
    pub city: String,
    pub district: Option<String>,
    pub address: Option<String>,
    pub price: i64,
    pub bedrooms: i16,
    pub bathrooms: i16,
    pub area_sqm: Option<i32>,
    pub amenities: serde_json::Value,
    pub media_keys: serde_json::Value,
    pub status: SalesStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<sales_property::Model> for SalesPropertyResponse {
    fn from(p: sales_property::Model) -> Self {
        Self {
            id: p.id,
            agency_id: p.agency_id,
            agent_id: p.agent_id,
            title: p.title,
            description: p.description,
            city: p.city,
            district: p.district,
            address: p.address,
            price: p.price,
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

/// Closed transaction response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: String,
    pub sales_property_id: String,
    pub listing_agent_id: String,
    pub selling_agent_id: String,
    pub buyer_name: String,
    pub buyer_email: Option<String>,
    pub buyer_phone: Option<String>,
    pub sale_price: i64,
    pub closed_on: String,
    pub created_at: String,
}

impl From<sales_transaction::Model> for TransactionResponse {
    fn from(t: sales_transaction::Model) -> Self {
        Self {
            id: t.id,
            sales_property_id: t.sales_property_id,
            listing_agent_id: t.listing_agent_id,
            selling_agent_id: t.selling_agent_id,
            buyer_name: t.buyer_name,
            buyer_email: t.buyer_email,
            buyer_phone: t.buyer_phone,
            sale_price: t.sale_price,
            closed_on: t.closed_on.to_string(),
            created_at: t.created_at.to_rfc3339(),
        }
    }
}

/// Sales commission response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesCommissionResponse {
    pub id: String,
    pub transaction_id: String,
    pub pool: i64,
    pub listing_commission: i64,
    pub selling_commission: i64,
    pub platform_fee: i64,
    pub status: CommissionStatus,
}

impl From<sales_commission::Model> for SalesCommissionResponse {
    fn from(c: sales_commission::Model) -> Self {
        Self {
            id: c.id,
            transaction_id: c.transaction_id,
            pool: c.pool,
            listing_commission: c.listing_commission,
            selling_commission: c.selling_commission,
            platform_fee: c.platform_fee,
            status: c.status,
        }
    }
}

/// Closed sale response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedSaleResponse {
    pub transaction: TransactionResponse,
    pub commission: SalesCommissionResponse,
}

/// List query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSalesQuery {
    pub status: Option<SalesStatus>,
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

/// List the agency's sales listings.
async fn list(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Query(query): Query<ListSalesQuery>,
) -> AppResult<ApiResponse<Paged<SalesPropertyResponse>>> {
    let agency_id = agent
        .agency_id
        .clone()
        .ok_or_else(|| AppError::BadRequest("Agent has no agency".to_string()))?;

    let filter = PropertyFilter {
        agency_id: Some(agency_id),
        status: None,
        city: query.city,
        search: query.search,
        limit: query.limit.min(100),
        offset: query.offset,
    };
    let (rows, total) = state.sales_service.list(&filter, query.status).await?;

    Ok(ApiResponse::ok(Paged {
        items: rows.into_iter().map(Into::into).collect(),
        total,
    }))
}

/// Create a draft sales listing.
async fn create(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Json(input): Json<CreateSalesPropertyInput>,
) -> AppResult<ApiResponse<SalesPropertyResponse>> {
    info!(agent_id = %agent.id, "Creating sales listing");

    let listing = state.sales_service.create(&agent, input).await?;

    Ok(ApiResponse::ok(listing.into()))
}

/// Get a sales listing.
async fn show(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<SalesPropertyResponse>> {
    let listing = state.sales_service.get_for_agent(&agent, &id).await?;

    Ok(ApiResponse::ok(listing.into()))
}

/// Update a sales listing.
async fn update(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateSalesPropertyInput>,
) -> AppResult<ApiResponse<SalesPropertyResponse>> {
    let listing = state.sales_service.update(&agent, &id, input).await?;

    Ok(ApiResponse::ok(listing.into()))
}

/// Delete a draft sales listing.
async fn remove(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    info!(agent_id = %agent.id, sales_property_id = %id, "Deleting sales listing");

    state.sales_service.delete(&agent, &id).await?;

    Ok(crate::response::ok())
}

/// Publish a sales listing.
async fn publish(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<SalesPropertyResponse>> {
    let listing = state.sales_service.publish(&agent, &id).await?;

    Ok(ApiResponse::ok(listing.into()))
}

/// Archive a sales listing.
async fn archive(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<SalesPropertyResponse>> {
    let listing = state.sales_service.archive(&agent, &id).await?;

    Ok(ApiResponse::ok(listing.into()))
}

/// Close a sale.
async fn close(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CloseSaleInput>,
) -> AppResult<ApiResponse<ClosedSaleResponse>> {
    info!(agent_id = %agent.id, sales_property_id = %id, "Closing sale");

    let (transaction, commission) = state.sales_service.close_sale(&agent, &id, input).await?;

    Ok(ApiResponse::ok(ClosedSaleResponse {
        transaction: transaction.into(),
        commission: commission.into(),
    }))
}

/// Transactions recorded against a listing.
async fn transactions(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<Vec<TransactionResponse>>> {
    let rows = state.sales_service.transactions(&agent, &id).await?;

    Ok(ApiResponse::ok(rows.into_iter().map(Into::into).collect()))
}

/// Create the sales router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).patch(update).delete(remove))
        .route("/{id}/publish", post(publish))
        .route("/{id}/archive", post(archive))
        .route("/{id}/close", post(close))
        .route("/{id}/transactions", get(transactions))
}
