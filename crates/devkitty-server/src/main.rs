//! DevKitty Server
//!
//! Question-bank web service. Custom questions are persisted in a live
//! database when one is reachable at startup, and in an in-memory fallback
//! store otherwise.

mod config;
mod handlers;
mod services;
mod storage;

use anyhow::{Context, Result};
use axum::{
    handler::HandlerWithoutStateExt,
    routing::{get, post, put},
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::services::QuestionStore;
use crate::storage::BackendResolver;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<QuestionStore>,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting DevKitty Server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = ServerConfig::load().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, environment={}, candidates={}",
        config.bind_address,
        config.environment,
        config.database_urls.len()
    );

    // Decide the persistence mode once for the life of the process
    let resolution = BackendResolver::new(config.connect_timeout())
        .accept_invalid_certs(config.is_production())
        .resolve(&config.database_urls)
        .await;
    info!("Persistence mode: {}", resolution.mode);

    let store = Arc::new(QuestionStore::new(resolution));
    info!("Question store ready ({} mode)", store.mode());

    let state = AppState { store };

    info!("Static files directory: {}", config.static_dir.display());
    let app = build_router(state, &config.static_dir);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let static_files =
        ServeDir::new(static_dir).not_found_service(handlers::not_found.into_service());

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Form post from the question page
        .route("/addQuestion", post(handlers::questions::create_from_form))
        // REST API routes
        .nest("/api", api_routes())
        // Static files, then 404
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/questions",
            get(handlers::questions::list).post(handlers::questions::create),
        )
        .route(
            "/questions/:id",
            put(handlers::questions::update).delete(handlers::questions::delete),
        )
}
