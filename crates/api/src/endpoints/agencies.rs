//! Agency endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use casaflow_common::AppResult;
use casaflow_core::{CreateAgencyInput, UpdateAgencyInput};
use casaflow_db::entities::agency;
use serde::Serialize;
use tracing::info;

use crate::{extractors::AuthAgent, middleware::AppState, response::ApiResponse};

/// Agency response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyResponse {
    pub id: String,
    pub name: String,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub logo_url: Option<String>,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub service_locations: serde_json::Value,
    pub created_at: String,
}

impl From<agency::Model> for AgencyResponse {
    fn from(a: agency::Model) -> Self {
        Self {
            id: a.id,
            name: a.name,
            primary_color: a.primary_color,
            secondary_color: a.secondary_color,
            logo_url: a.logo_url,
            contact_email: a.contact_email,
            contact_phone: a.contact_phone,
            website: a.website,
            service_locations: a.service_locations,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// Create an agency; the creator becomes its admin.
async fn create(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Json(input): Json<CreateAgencyInput>,
) -> AppResult<ApiResponse<AgencyResponse>> {
    info!(agent_id = %agent.id, "Creating agency");

    let agency = state.agency_service.create(&agent, input).await?;

    Ok(ApiResponse::ok(agency.into()))
}

/// Get an agency.
async fn show(
    AuthAgent(_agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<AgencyResponse>> {
    let agency = state.agency_service.get(&id).await?;

    Ok(ApiResponse::ok(agency.into()))
}

/// Join an existing agency.
async fn join(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<AgencyResponse>> {
    info!(agent_id = %agent.id, agency_id = %id, "Joining agency");

    let agency = state.agency_service.join(&agent, &id).await?;

    Ok(ApiResponse::ok(agency.into()))
}

/// Update agency branding and contact details. Admin only.
async fn update(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateAgencyInput>,
) -> AppResult<ApiResponse<AgencyResponse>> {
    let agency = state.agency_service.update(&agent, &id, input).await?;

    Ok(ApiResponse::ok(agency.into()))
}

/// Create the agency router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/{id}", get(show).patch(update))
        .route("/{id}/join", post(join))
}
