//! Core data types for verdant-rasterizer

use crate::error::{Error, Result};

/// Represents raster dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl Dimensions {
    /// Creates new dimensions
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Returns the total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}

/// Geographic bounding box in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Creates a bounding box, enforcing south < north and west < east
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self> {
        if !(south < north && west < east) {
            return Err(Error::InvalidGeometry(format!(
                "empty bounding box extent ({}, {}, {}, {})",
                south, west, north, east
            )));
        }
        Ok(Self { south, west, north, east })
    }

    /// East-west extent in degrees
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// North-south extent in degrees
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Center point as (lon, lat)
    pub fn center(&self) -> (f64, f64) {
        (
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    /// Wire ordering used by the API: [south, west, north, east]
    pub fn to_array(&self) -> [f64; 4] {
        [self.south, self.west, self.north, self.east]
    }
}

/// Summary statistics over the valid pixels of an NDVI raster.
///
/// All fields are `None` when the raster has zero valid pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Statistics {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let dims = Dimensions::new(100, 200);
        assert_eq!(dims.width, 100);
        assert_eq!(dims.height, 200);
        assert_eq!(dims.pixel_count(), 20000);
    }

    #[test]
    fn test_bounding_box_extent() {
        let bbox = BoundingBox::new(36.80, 10.18, 36.81, 10.19).unwrap();
        assert!((bbox.width() - 0.01).abs() < 1e-12);
        assert!((bbox.height() - 0.01).abs() < 1e-12);
        let (lon, lat) = bbox.center();
        assert!((lon - 10.185).abs() < 1e-12);
        assert!((lat - 36.805).abs() < 1e-12);
    }

    #[test]
    fn test_bounding_box_rejects_empty_extent() {
        assert!(BoundingBox::new(36.80, 10.18, 36.80, 10.19).is_err());
        assert!(BoundingBox::new(36.80, 10.19, 36.81, 10.18).is_err());
    }

    #[test]
    fn test_bounding_box_array_ordering() {
        let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0).unwrap();
        assert_eq!(bbox.to_array(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_statistics_default_all_none() {
        let stats = Statistics::default();
        assert!(stats.min.is_none() && stats.max.is_none() && stats.mean.is_none());
    }
}
