use clap::Parser;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contigq::{
    Config,
    handlers::{AppState, create_router},
    storage::{DownloadCache, LocalStorage, Storage},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let storage = create_storage(&config)?;
    let cache = Arc::new(DownloadCache::new(config.cache_dir.clone())?);

    let state = AppState { storage, cache };

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let app = if config.cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    };

    let addr = config.bind_address();
    tracing::info!("Starting contigq server on {}", addr);
    tracing::info!("Cache directory: {:?}", config.cache_dir);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_storage(config: &Config) -> anyhow::Result<Arc<dyn Storage>> {
    match &config.remote_url {
        #[cfg(feature = "http")]
        Some(url) => {
            tracing::info!("Remote data URL: {}", url);
            Ok(Arc::new(contigq::storage::HttpStorage::new(url.clone())?))
        }
        #[cfg(not(feature = "http"))]
        Some(_) => anyhow::bail!("--remote-url requires the `http` feature"),
        None => {
            tracing::info!("Data directory: {:?}", config.data_dir);
            Ok(Arc::new(LocalStorage::new(config.data_dir.clone())))
        }
    }
}
