//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use casaflow_core::{
    AgencyService, AgentService, AuthService, BookingService, PropertyService, SalesService,
    StorageService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub agent_service: AgentService,
    pub agency_service: AgencyService,
    pub property_service: PropertyService,
    pub sales_service: SalesService,
    pub booking_service: BookingService,
    pub storage_service: StorageService,
}

/// Authentication middleware.
///
/// Decodes the bearer token and, when valid, stores the agent model in the
/// request extensions for the extractors. Requests without a valid token
/// pass through; protected handlers reject them via [`crate::extractors::AuthAgent`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(claims) = state.auth_service.decode_token(token)
        && let Ok(agent) = state.agent_service.get(&claims.sub).await
    {
        req.extensions_mut().insert(agent);
    }

    next.run(req).await
}
