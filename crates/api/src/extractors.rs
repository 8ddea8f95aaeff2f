//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use casaflow_db::entities::agent;
use casaflow_db::entities::agent::AgentRole;

/// Authenticated agent extractor.
#[derive(Debug, Clone)]
pub struct AuthAgent(pub agent::Model);

impl<S> FromRequestParts<S> for AuthAgent
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by the auth middleware
        parts
            .extensions
            .get::<agent::Model>()
            .cloned()
            .map(AuthAgent)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// Authenticated admin extractor.
#[derive(Debug, Clone)]
pub struct AdminAgent(pub agent::Model);

impl<S> FromRequestParts<S> for AdminAgent
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let agent = parts
            .extensions
            .get::<agent::Model>()
            .cloned()
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))?;

        if agent.role != AgentRole::Admin {
            return Err((StatusCode::FORBIDDEN, "Admin role required"));
        }

        Ok(Self(agent))
    }
}
