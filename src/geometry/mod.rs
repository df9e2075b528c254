//! Input geometry handling
//!
//! Turns a user-drawn GeoJSON polygon into a bounding box and a pixel grid
//! definition the rest of the pipeline works against.

pub mod grid;
pub mod polygon;

pub use grid::{GeoTransform, RasterGrid, METERS_PER_DEGREE};
pub use polygon::Polygon;
