//! Authenticated agent profile endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use axum::Json;
use casaflow_common::AppResult;
use casaflow_core::UpdateProfileInput;
use casaflow_db::entities::agent;
use casaflow_db::entities::agent::AgentRole;
use serde::Serialize;
use tracing::info;

use crate::{extractors::AuthAgent, middleware::AppState, response::ApiResponse};

/// Agent response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: AgentRole,
    pub onboarding_step: i16,
    pub email_verified: bool,
    pub agency_id: Option<String>,
    pub created_at: String,
}

impl From<agent::Model> for AgentResponse {
    fn from(a: agent::Model) -> Self {
        Self {
            id: a.id,
            email: a.email,
            name: a.name,
            phone: a.phone,
            avatar_url: a.avatar_url,
            role: a.role,
            onboarding_step: a.onboarding_step,
            email_verified: a.email_verified,
            agency_id: a.agency_id,
            created_at: a.created_at.to_rfc3339(),
        }
    }
}

/// Get the authenticated agent.
async fn me(AuthAgent(agent): AuthAgent) -> ApiResponse<AgentResponse> {
    ApiResponse::ok(agent.into())
}

/// Update the authenticated agent's profile.
async fn update(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<AgentResponse>> {
    let agent = state.agent_service.update_profile(&agent.id, input).await?;

    Ok(ApiResponse::ok(agent.into()))
}

/// Mark onboarding complete.
async fn complete_onboarding(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<AgentResponse>> {
    info!(agent_id = %agent.id, "Completing onboarding");

    let agent = state.agent_service.complete_onboarding(&agent.id).await?;

    Ok(ApiResponse::ok(agent.into()))
}

/// Create the profile router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(me).patch(update))
        .route("/complete-onboarding", post(complete_onboarding))
}
