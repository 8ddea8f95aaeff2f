//! Agency roster endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::get,
};
use casaflow_common::{AppError, AppResult};
use tracing::info;

use crate::endpoints::profile::AgentResponse;
use crate::{
    extractors::{AdminAgent, AuthAgent},
    middleware::AppState,
    response::ApiResponse,
};

/// List the agents in the caller's agency.
async fn list(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<AgentResponse>>> {
    let agency_id = agent
        .agency_id
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("Agent has no agency".to_string()))?;

    let agents = state.agent_service.list_by_agency(agency_id).await?;

    Ok(ApiResponse::ok(
        agents.into_iter().map(Into::into).collect(),
    ))
}

/// Remove an agent from the agency. Admin only.
async fn remove(
    AdminAgent(admin): AdminAgent,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl axum::response::IntoResponse> {
    info!(admin_id = %admin.id, agent_id = %id, "Removing agent from agency");

    state.agent_service.remove(&admin, &id).await?;

    Ok(crate::response::ok())
}

/// Create the agents router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", axum::routing::delete(remove))
}
