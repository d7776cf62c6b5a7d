//! PhishLens Relay
//!
//! Local coordination service for the PhishLens browser extension and
//! dashboard. The extension's content script and popup, and the dashboard
//! web app, are thin clients of this service.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      PHISHLENS RELAY                         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌──────────────┐  ┌───────────────────────┐  │
//! │  │  API      │  │  Classifier  │  │  Result Broadcast     │  │
//! │  │  (Axum)   │  │  Client      │  │  (SSE to popups)      │  │
//! │  └─────┬─────┘  └──────┬───────┘  └──────────┬────────────┘  │
//! │        └───────────────┼─────────────────────┘               │
//! │                        ▼                                     │
//! │                 ┌─────────────┐                              │
//! │                 │ Scan Store  │                              │
//! │                 │ (JSON doc)  │                              │
//! │                 └─────────────┘                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod store;
mod models;
mod handlers;
mod logic;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::sync::broadcast;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logic::classifier::{ClassifierClient, ClassifierConfig};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "phishlens_relay=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("PhishLens relay starting...");
    tracing::info!("Classifier endpoint: {}", config.classifier_url);

    // Open the scan store
    let store = Arc::new(store::ScanStore::open(&config.store_path)?);
    tracing::info!(
        "Scan store ready: {} scans at {}",
        store.len(),
        config.store_path.display()
    );

    // Load fallback rules
    let rules = Arc::new(models::rule::load_rules(&config.rules_path));

    // Classifier client
    let classifier = Arc::new(ClassifierClient::new(ClassifierConfig {
        base_url: config.classifier_url.clone(),
        timeout_seconds: config.classifier_timeout_seconds,
    }));

    // Result broadcast channel for popup subscribers
    let (events, _) = broadcast::channel(16);

    // Build application state
    let state = AppState {
        config: config.clone(),
        store,
        rules,
        classifier,
        events,
    };

    // Build router
    let app = create_router(state);

    // Start server (local companion service, loopback only)
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!("Relay listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub store: Arc<store::ScanStore>,
    pub rules: Arc<Vec<models::AnalysisRule>>,
    pub classifier: Arc<ClassifierClient>,
    pub events: broadcast::Sender<handlers::events::ScanEvent>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))

        // Analysis (the ANALYZE / FORCE_ANALYZE contracts)
        .route("/api/v1/analyze", post(handlers::analyze::analyze))
        .route("/api/v1/analyze/page", post(handlers::analyze::analyze_page))
        .route("/api/v1/analyze/manual", post(handlers::analyze::analyze_manual))

        // Result broadcast for popups
        .route("/api/v1/events", get(handlers::events::subscribe))

        // Scan store
        .route("/api/v1/scans", get(handlers::scans::list))
        .route("/api/v1/scans", delete(handlers::scans::clear))
        .route("/api/v1/scans/stats", get(handlers::scans::stats))
        .route("/api/v1/scans/:id", get(handlers::scans::get))

        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
