//! HTTP API layer for casaflow.
//!
//! - **Endpoints**: the agency-facing REST API
//! - **Extractors**: authenticated agent, admin role
//! - **Middleware**: bearer-token authentication
//!
//! Built on Axum 0.8 with a Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
