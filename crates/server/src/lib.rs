//! HTTP front end for harvest-core.
//!
//! Routes:
//!
//! - `GET /` landing page
//! - `GET /health` liveness probe
//! - `POST /scrape` run a [`ScrapeRequest`](harvest_core::ScrapeRequest)

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use harvest_core::{Harvester, HarvesterConfig};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;

/// Shared per-process state.
///
/// The harvester owns the HTTP client pool; it is created once at startup
/// and dropped on shutdown.
#[derive(Clone)]
pub struct AppState {
    pub harvester: Arc<Harvester>,
}

impl AppState {
    pub fn new(config: HarvesterConfig) -> harvest_core::Result<Self> {
        Ok(Self { harvester: Arc::new(Harvester::new(config)?) })
    }
}

/// Builds the application router.
///
/// `request_timeout` caps the whole request and answers 504 when it fires.
pub fn app(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/scrape", post(routes::scrape))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::with_status_code(StatusCode::GATEWAY_TIMEOUT, request_timeout))
}
