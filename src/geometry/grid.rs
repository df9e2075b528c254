//! Raster grid resolution
//!
//! Maps a bounding box to a pixel grid at a configured ground resolution.
//! The grid always covers the box exactly: the per-axis degree step is
//! re-derived from the final pixel counts, so corner alignment survives the
//! dimension caps.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{BoundingBox, Dimensions};

/// Approximate metres per degree of latitude on the WGS84 ellipsoid
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Affine mapping from pixel (col, row) to geographic (lon, lat).
///
/// The origin is the north-west corner of the grid; the y step is negative
/// because rows advance southward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub origin_lon: f64,
    pub origin_lat: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl GeoTransform {
    /// Maps fractional pixel coordinates to (lon, lat)
    pub fn pixel_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.origin_lon + self.pixel_width * col,
            self.origin_lat + self.pixel_height * row,
        )
    }
}

/// A pixel grid bound to geographic space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterGrid {
    pub dims: Dimensions,
    pub transform: GeoTransform,
}

/// Resolves a bounding box into a raster grid.
///
/// Fails with `GeometryTooLarge` when either axis of the box exceeds the
/// configured span ceiling. When the natural pixel counts at the configured
/// resolution exceed the dimension cap, both axes are coarsened by the same
/// factor rather than truncated.
pub fn resolve(bbox: &BoundingBox, config: &Config) -> Result<RasterGrid> {
    if bbox.width() > config.max_span_deg || bbox.height() > config.max_span_deg {
        return Err(Error::GeometryTooLarge(format!(
            "bounding box spans {:.4} x {:.4} deg, limit is {:.4} deg per axis",
            bbox.width(),
            bbox.height(),
            config.max_span_deg
        )));
    }

    let step = config.resolution_m / METERS_PER_DEGREE;
    if !(step > 0.0) {
        return Err(Error::Computation(format!(
            "non-positive resolution {} m",
            config.resolution_m
        )));
    }

    let mut width = (bbox.width() / step).ceil() as usize;
    let mut height = (bbox.height() / step).ceil() as usize;
    width = width.max(config.min_grid_dim).max(1);
    height = height.max(config.min_grid_dim).max(1);

    let largest = width.max(height);
    if largest > config.max_grid_dim {
        let scale = largest as f64 / config.max_grid_dim as f64;
        width = ((width as f64 / scale).round() as usize).max(1);
        height = ((height as f64 / scale).round() as usize).max(1);
    }

    let dims = Dimensions::new(width, height);
    let transform = GeoTransform {
        origin_lon: bbox.west,
        origin_lat: bbox.north,
        pixel_width: bbox.width() / width as f64,
        pixel_height: -(bbox.height() / height as f64),
    };

    Ok(RasterGrid { dims, transform })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(side: f64) -> BoundingBox {
        BoundingBox::new(36.80, 10.18, 36.80 + side, 10.18 + side).unwrap()
    }

    #[test]
    fn test_corner_alignment() {
        let bbox = bbox(0.01);
        let grid = resolve(&bbox, &Config::default()).unwrap();

        let (lon, lat) = grid.transform.pixel_to_geo(0.0, 0.0);
        assert!((lon - bbox.west).abs() < 1e-12);
        assert!((lat - bbox.north).abs() < 1e-12);

        let (lon, lat) = grid
            .transform
            .pixel_to_geo(grid.dims.width as f64, grid.dims.height as f64);
        assert!((lon - bbox.east).abs() < 1e-9);
        assert!((lat - bbox.south).abs() < 1e-9);
    }

    #[test]
    fn test_natural_resolution() {
        // 0.01 deg at 10 m is ~111 pixels
        let grid = resolve(&bbox(0.01), &Config::default()).unwrap();
        assert!(grid.dims.width >= 100 && grid.dims.width <= 120);
        assert_eq!(grid.dims.width, grid.dims.height);
    }

    #[test]
    fn test_minimum_dimension_floor() {
        let grid = resolve(&bbox(0.0001), &Config::default()).unwrap();
        assert_eq!(grid.dims.width, 32);
        assert_eq!(grid.dims.height, 32);
    }

    #[test]
    fn test_cap_coarsens_proportionally() {
        // 1 deg at 10 m would be ~11132 pixels; the cap coarsens, not crops
        let bbox = BoundingBox::new(36.0, 10.0, 37.0, 11.0).unwrap();
        let grid = resolve(&bbox, &Config::default()).unwrap();
        assert_eq!(grid.dims.width.max(grid.dims.height), 2048);

        let (lon, lat) = grid
            .transform
            .pixel_to_geo(grid.dims.width as f64, grid.dims.height as f64);
        assert!((lon - bbox.east).abs() < 1e-9);
        assert!((lat - bbox.south).abs() < 1e-9);
    }

    #[test]
    fn test_rectangular_cap_keeps_aspect() {
        let bbox = BoundingBox::new(36.0, 10.0, 36.5, 11.0).unwrap();
        let grid = resolve(&bbox, &Config::default()).unwrap();
        assert_eq!(grid.dims.width, 2048);
        let aspect = grid.dims.width as f64 / grid.dims.height as f64;
        assert!((aspect - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_span_ceiling() {
        let bbox = BoundingBox::new(30.0, 10.0, 40.0, 20.0).unwrap();
        let err = resolve(&bbox, &Config::default()).unwrap_err();
        assert!(matches!(err, Error::GeometryTooLarge(_)));
    }
}
