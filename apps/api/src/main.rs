mod config;
mod errors;
mod export;
mod models;
mod render;
mod resume;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::CommandPdfRenderer;
use crate::resume::autosave::spawn_autosave;
use crate::resume::store::ResumeStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{FileStore, Persistence};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting QuickCV API v{}", env!("CARGO_PKG_VERSION"));

    // Restore the last saved resume
    let file_store = FileStore::new(&config.storage_dir);
    info!("Storage directory: {}", file_store.dir().display());
    let persistence = Persistence::new(Arc::new(file_store));
    let (store, outcome) = ResumeStore::open(persistence, config.autosave_enabled).await;
    for warning in &outcome.warnings {
        warn!("Restored {:?} from defaults: {}", warning.part, warning.message);
    }
    let store = Arc::new(store);

    // Autosave runs for the life of the process; the toggle is checked when it fires
    spawn_autosave(store.clone(), config.autosave_delay);
    info!(
        "Autosave {} ({}ms after the last edit)",
        if config.autosave_enabled { "enabled" } else { "disabled" },
        config.autosave_delay.as_millis()
    );

    let pdf = Arc::new(CommandPdfRenderer::new(&config.pdf_renderer_bin));
    info!("PDF renderer: {}", config.pdf_renderer_bin);

    let state = AppState {
        store,
        pdf,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
