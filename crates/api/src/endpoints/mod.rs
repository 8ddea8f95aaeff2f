//! API endpoints.

mod agencies;
mod agents;
mod auth;
mod bookings;
mod profile;
mod properties;
mod sales;
mod upload;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profile", profile::router())
        .nest("/agencies", agencies::router())
        .nest("/agents", agents::router())
        .nest("/properties", properties::router())
        .nest("/sales-properties", sales::router())
        .nest("/bookings", bookings::router())
        .nest("/upload", upload::router())
}
