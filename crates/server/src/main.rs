//! Casaflow server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use casaflow_api::{AppState, auth_middleware, router as api_router};
use casaflow_common::storage::{LocalStorage, UploadUrlSigner};
use casaflow_common::{AppError, Config};
use casaflow_core::{
    AgencyService, AgentService, AuthService, BookingService, EmailService, PropertyService,
    SalesService, StorageService,
};
use casaflow_db::repositories::{
    AgencyRepository, AgentRepository, AvailabilityRepository, BookingRepository, OtpRepository,
    PropertyRepository, SalesPropertyRepository, SalesTransactionRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install signal handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

async fn health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "casaflow=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting casaflow server...");

    let config = Config::load()?;

    let db = casaflow_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    casaflow_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Repositories
    let agency_repo = AgencyRepository::new(db.clone());
    let agent_repo = AgentRepository::new(db.clone());
    let availability_repo = AvailabilityRepository::new(db.clone());
    let booking_repo = BookingRepository::new(db.clone());
    let otp_repo = OtpRepository::new(db.clone());
    let property_repo = PropertyRepository::new(db.clone());
    let sales_repo = SalesPropertyRepository::new(db.clone());
    let sales_transaction_repo = SalesTransactionRepository::new(db.clone());

    // Storage
    let storage_backend = Arc::new(LocalStorage::new(
        PathBuf::from(&config.storage.base_path),
        config.storage.base_url.clone(),
    ));
    let signing_secret = config
        .storage
        .signing_secret
        .clone()
        .ok_or_else(|| AppError::Config("storage.signing_secret is required".to_string()))?;
    let signer = UploadUrlSigner::new(&signing_secret, &config.server.url);

    // Services
    let email_service = EmailService::new(&config.email)?;
    let state = AppState {
        auth_service: AuthService::new(
            agent_repo.clone(),
            otp_repo,
            email_service,
            config.auth.clone(),
        ),
        agent_service: AgentService::new(agent_repo.clone()),
        agency_service: AgencyService::new(agency_repo, agent_repo.clone()),
        property_service: PropertyService::new(property_repo.clone(), availability_repo),
        sales_service: SalesService::new(sales_repo, sales_transaction_repo, agent_repo.clone()),
        booking_service: BookingService::new(
            booking_repo,
            property_repo,
            agent_repo,
            config.commission.clone(),
        ),
        storage_service: StorageService::new(
            storage_backend,
            signer,
            config.storage.upload_ttl_minutes,
        ),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .nest_service(
            config.storage.base_url.as_str(),
            ServeDir::new(&config.storage.base_path),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}
