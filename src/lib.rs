//! verdant-rasterizer - NDVI rasters for user-drawn areas
//!
//! Turns a GeoJSON polygon into a georeferenced NDVI raster and a
//! map-alignable overlay image: the bounding box becomes a pixel grid, red
//! and near-infrared reflectance is acquired (live Sentinel-2 data or a
//! deterministic synthetic field), cloudy and unusable pixels are masked,
//! the index is computed, and both assets are written under a static-served
//! directory together with summary statistics.
//!
//! # Examples
//!
//! ```no_run
//! use verdant_rasterizer::config::Config;
//! use verdant_rasterizer::pipeline;
//!
//! # async fn run() -> Result<(), verdant_rasterizer::Error> {
//! let config = Config::from_env();
//! let geometry = serde_json::json!({
//!     "type": "Polygon",
//!     "coordinates": [[
//!         [10.1815, 36.8065],
//!         [10.1915, 36.8065],
//!         [10.1915, 36.8165],
//!         [10.1815, 36.8165],
//!         [10.1815, 36.8065],
//!     ]]
//! });
//!
//! let output = pipeline::run(&config, None, &geometry).await?;
//! println!("raster: {}", output.record.raster_path.display());
//! println!("overlay: {}", output.record.overlay_url);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod assets;
pub mod bands;
pub mod compression;
pub mod config;
pub mod error;
pub mod formats;
pub mod geometry;
pub mod mask;
pub mod ndvi;
pub mod pipeline;
pub mod render;
pub mod types;

pub use assets::AssetRecord;
pub use bands::{BandPair, BandSource};
pub use config::Config;
pub use error::{Error, Result};
pub use geometry::{Polygon, RasterGrid};
pub use ndvi::NdviRaster;
pub use types::{BoundingBox, Dimensions, Statistics};
