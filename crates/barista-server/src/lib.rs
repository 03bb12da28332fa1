//! Barista kiosk server library logic.

pub mod api;
pub mod api_announcer;
pub mod api_order;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use barista_misspell::{AnthropicGenerator, MisspellGenerator};
use barista_voice::{Announcer, ConnectionManager, HttpDeviceConnector};
use config::{Config, LoggingConfig};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Text-generation collaborator.
    pub generator: Arc<dyn MisspellGenerator>,
    /// Process-wide speech device connection.
    pub connections: Arc<ConnectionManager>,
    /// Queue feeding the announcement worker.
    pub announcer: Announcer,
}

impl AppState {
    /// Builds production state from configuration.
    ///
    /// Spawns the announcement worker, so it must run inside a tokio runtime.
    /// No device handshake happens here; the first announcement triggers it.
    pub fn from_config(config: &Config) -> Self {
        let generator: Arc<dyn MisspellGenerator> =
            Arc::new(AnthropicGenerator::from_config(&config.llm));

        let connector = Arc::new(HttpDeviceConnector::new(config.device.clone()));
        let connections = Arc::new(ConnectionManager::new(
            connector,
            config.device.connect_timeout(),
        ));
        let announcer = Announcer::spawn(
            connections.clone(),
            config.announcer.queue_capacity,
            config.device.speak_timeout(),
        );

        Self {
            generator,
            connections,
            announcer,
        }
    }
}

/// Maximum request body size (16 KiB). Order bodies carry a single name.
const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/misspell", post(api_order::misspell_handler))
        .route(
            "/api/announcer/status",
            get(api_announcer::announcer_status_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}

/// Initializes the global tracing subscriber from logging configuration.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
