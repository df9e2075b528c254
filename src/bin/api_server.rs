use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use verdant_rasterizer::api::{create_router, AppState};
use verdant_rasterizer::config::Config;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr.clone();
    let live_configured = config.live_configured();

    let state = AppState::from_config(config).expect("Failed to build application state");
    let app = create_router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind port");

    tracing::info!(addr = %bind_addr, "NDVI API server listening");
    tracing::info!(
        "band source: {}",
        if live_configured {
            "sentinel-hub (synthetic fallback)"
        } else {
            "synthetic only"
        }
    );
    tracing::info!("POST /api/ndvi with {{ \"geometry\": <GeoJSON Polygon> }}");

    axum::serve(listener, app).await.expect("Server error");
}
