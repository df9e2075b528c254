//! HTTP surface for the NDVI pipeline

pub mod handlers;
pub mod models;
pub mod routes;

pub use routes::create_router;

use crate::bands::SentinelHub;
use crate::config::Config;
use crate::error::Result;

/// Shared state for the API handlers
pub struct AppState {
    pub config: Config,
    pub live: Option<SentinelHub>,
}

impl AppState {
    /// Builds state from configuration, constructing the live band source
    /// once when credentials are present
    pub fn from_config(config: Config) -> Result<Self> {
        let live = SentinelHub::from_config(&config)?;
        Ok(Self { config, live })
    }
}
