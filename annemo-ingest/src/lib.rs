//! # Annemo Ingest (annemo-ingest)
//!
//! HTTP service that receives emotion and social annotation samples from
//! registered subjects and appends them to per-key CSV logs.
//!
//! **Architecture:** registry check → record formatting → append log store,
//! with a results manager operating on the same directory.

use annemo_common::config::Settings;
use annemo_common::Registry;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod ingest;
pub mod record;
pub mod results;
pub mod store;

pub use error::ApiError;
pub use ingest::IngestionService;
pub use results::ResultsManager;
pub use store::AppendLogStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub ingest: Arc<IngestionService>,
    pub results: Arc<ResultsManager>,
}

impl AppState {
    pub fn new(ingest: Arc<IngestionService>, results: Arc<ResultsManager>) -> Self {
        Self { ingest, results }
    }

    /// Open the results store and wire the services for `registry`
    pub async fn open(settings: &Settings, registry: Arc<Registry>) -> annemo_common::Result<Self> {
        let store = Arc::new(AppendLogStore::open(&settings.results_dir, settings.sync_writes).await?);
        let ingest = IngestionService::new(registry, Arc::clone(&store), settings.key_layout);
        let results = ResultsManager::new(store);
        Ok(Self::new(Arc::new(ingest), Arc::new(results)))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        // Ingestion
        .route("/emotion", post(api::submit_emotion))
        .route("/social", post(api::submit_social))
        // Catalog
        .route("/videos", get(api::list_videos))
        .route("/location", get(api::get_location))
        // Results management
        .route("/results", get(api::list_results))
        .route(
            "/results/:name",
            get(api::download_result).delete(api::delete_result),
        )
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
