use axum::{
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chess960_explorer_core::{Error, Explorer, PositionRepository};

mod config;
mod routes;

use config::ExplorerConfig;

pub struct AppState {
    pub explorer: Mutex<Explorer>,
    pub loaded_at: Mutex<Option<chrono::DateTime<chrono::Utc>>>,
}

/// Reads the dataset in the background; interaction stays disabled until it resolves
async fn load_dataset(state: Arc<AppState>, path: PathBuf) {
    info!(path = %path.display(), "Loading dataset");

    let result = match tokio::fs::read_to_string(&path).await {
        Ok(text) => PositionRepository::from_json_str(&text),
        Err(e) => Err(Error::DataLoad(format!("cannot read {}: {}", path.display(), e))),
    };

    let Ok(mut explorer) = state.explorer.lock() else {
        error!("Explorer lock poisoned, dataset discarded");
        return;
    };
    if explorer.complete_load(result).is_ok() {
        if let Ok(mut loaded_at) = state.loaded_at.lock() {
            *loaded_at = Some(chrono::Utc::now());
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match ExplorerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState {
        explorer: Mutex::new(Explorer::new()),
        loaded_at: Mutex::new(None),
    });

    tokio::spawn(load_dataset(state.clone(), config.dataset_path.clone()));

    let app = Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/api/status", get(routes::api::status))
        .route("/api/view", get(routes::api::view))
        .route("/api/filter", post(routes::api::apply_filter))
        .route("/api/highlight", post(routes::api::toggle_highlight))
        .route("/api/reset", post(routes::api::reset))
        .route("/api/positions/:number", get(routes::api::position))
        .route("/api/practice", get(routes::api::practice))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind_addr, e);
            std::process::exit(1);
        }
    };

    info!("Server running at http://{}", config.bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
