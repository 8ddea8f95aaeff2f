//! Authentication endpoints.

use axum::{Json, Router, extract::State, routing::post};
use casaflow_common::AppResult;
use casaflow_core::{RequestOtpInput, VerifyOtpInput};
use serde::Serialize;
use tracing::info;

use crate::endpoints::profile::AgentResponse;
use crate::{middleware::AppState, response::ApiResponse};

/// Verified login response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub agent: AgentResponse,
}

/// Mail a one-time passcode.
async fn request_otp(
    State(state): State<AppState>,
    Json(input): Json<RequestOtpInput>,
) -> AppResult<impl axum::response::IntoResponse> {
    state.auth_service.request_otp(input).await?;

    Ok(crate::response::ok())
}

/// Verify a passcode and issue a bearer token.
async fn verify_otp(
    State(state): State<AppState>,
    Json(input): Json<VerifyOtpInput>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let login = state.auth_service.verify_otp(input).await?;
    info!(agent_id = %login.agent.id, "Agent logged in");

    Ok(ApiResponse::ok(LoginResponse {
        token: login.token,
        agent: login.agent.into(),
    }))
}

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request-otp", post(request_otp))
        .route("/verify-otp", post(verify_otp))
}
