mod config;
mod db;
mod document;
mod errors;
mod models;
mod resume;
mod routes;
mod state;
mod storage;
mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::resume::sessions::SessionRegistry;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::postgres::PgResumeStorage;
use crate::storage::ResumeStorage;
use crate::templates::TemplateCatalog;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Studio API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL-backed resume storage
    let pool = create_pool(&config.database_url).await?;
    let storage: Arc<dyn ResumeStorage> = Arc::new(PgResumeStorage::new(pool));

    // One-shot, best-effort template catalog read
    let templates = Arc::new(TemplateCatalog::load(storage.as_ref()).await);

    // Build app state
    let state = AppState {
        storage,
        templates,
        sessions: Arc::new(SessionRegistry::new()),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
