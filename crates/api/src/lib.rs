//! # ParkSpot API
//!
//! The API crate provides the web server for the ParkSpot parking-slot
//! reservation service. It exposes typed JSON routes for slots, bookings and
//! user sessions on top of the transport-agnostic booking service.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into booking service calls
//! - **Middleware**: Authentication extractor and error mapping
//! - **Config**: Environment-driven settings
//!
//! The API uses Axum as the web framework; persistence goes through the
//! store traits from `parkspot-core`, backed by PostgreSQL in production.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{path::Path, sync::Arc, time::Duration};

use axum::{
    error_handling::HandleErrorLayer,
    http::{header, HeaderValue, Method, StatusCode},
    BoxError, Router,
};
use eyre::Result;
use parkspot_core::{
    booking::BookingService,
    store::{IdentityStore, SlotStore},
};
use parkspot_db::{DbPool, PgIdentityStore, PgSlotStore};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Booking rules over the slot store
    pub booking: BookingService,
    /// Users and login sessions
    pub identity: Arc<dyn IdentityStore>,
    /// Lifetime of newly issued sessions
    pub session_ttl: chrono::Duration,
}

impl ApiState {
    pub fn new(
        slots: Arc<dyn SlotStore>,
        identity: Arc<dyn IdentityStore>,
        session_ttl: chrono::Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            booking: BookingService::new(slots),
            identity,
            session_ttl,
        })
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` overrides the configured level.
pub fn init_tracing(config: &config::ApiConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_lowercase()));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Builds the application router with every route and layer attached.
pub fn build_router(state: Arc<ApiState>, config: &config::ApiConfig) -> Router {
    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Account and session endpoints
        .merge(routes::auth::routes())
        // Parking slot and booking endpoints
        .merge(routes::slot::routes())
        .with_state(state);

    // Serve the web client for everything the API does not handle
    let app = match &config.static_dir {
        Some(dir) => app.fallback_service(spa_service(dir)),
        None => app,
    };

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    let timeout = Duration::from_secs(config.request_timeout);
    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(HandleErrorLayer::new(|err: BoxError| async move {
                warn!("request aborted: {}", err);
                StatusCode::REQUEST_TIMEOUT
            }))
            .timeout(timeout),
    )
}

fn spa_service(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and database connection
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    let store_timeout = config.store_timeout();
    let state = ApiState::new(
        Arc::new(PgSlotStore::new(db_pool.clone(), store_timeout)),
        Arc::new(PgIdentityStore::new(db_pool, store_timeout)),
        config.session_ttl(),
    );

    let app = build_router(state, &config);

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
