mod cache_path;
mod features;
mod service_info;

pub use cache_path::get_cache_path;
pub use features::{get_contig, get_features, get_url_features};
pub use service_info::service_info;

use crate::storage::{DownloadCache, Storage};
use axum::{Router, routing::get};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<DownloadCache>,
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/features", get(get_url_features))
        .route("/features/:id", get(get_features))
        .route("/features/:id/contigs/:name", get(get_contig))
        .route("/cache-path", get(get_cache_path))
        .route("/", get(service_info))
        .route("/service-info", get(service_info))
        .with_state(state)
}
