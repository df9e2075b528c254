//! GeoJSON polygon parsing and validation

use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::BoundingBox;

/// Outer rings with a shoelace area below this are rejected as degenerate
const MIN_RING_AREA_DEG2: f64 = 1e-12;

/// A validated polygon: one or more closed rings of (lon, lat) pairs, WGS84
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    rings: Vec<Vec<(f64, f64)>>,
}

impl Polygon {
    /// Parses a GeoJSON geometry object.
    ///
    /// Only `"type": "Polygon"` is accepted. Rings are closed automatically
    /// when the last point differs from the first; rings with fewer than four
    /// points after closure, out-of-range coordinates, or a near-zero outer
    /// ring area are rejected.
    pub fn from_geojson(geometry: &Value) -> Result<Self> {
        let obj = geometry
            .as_object()
            .ok_or_else(|| Error::InvalidGeometry("geometry must be a JSON object".to_string()))?;

        let kind = obj.get("type").and_then(Value::as_str).unwrap_or("");
        if kind != "Polygon" {
            return Err(Error::InvalidGeometry(format!(
                "unsupported geometry type '{}', expected Polygon",
                kind
            )));
        }

        let coords = obj
            .get("coordinates")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::InvalidGeometry("missing coordinates array".to_string()))?;
        if coords.is_empty() {
            return Err(Error::InvalidGeometry("polygon has no rings".to_string()));
        }

        let rings = coords
            .iter()
            .map(parse_ring)
            .collect::<Result<Vec<_>>>()?;

        if ring_area(&rings[0]).abs() < MIN_RING_AREA_DEG2 {
            return Err(Error::InvalidGeometry(
                "degenerate polygon with near-zero area".to_string(),
            ));
        }

        Ok(Self { rings })
    }

    /// All rings, outer ring first
    pub fn rings(&self) -> &[Vec<(f64, f64)>] {
        &self.rings
    }

    /// Minimal axis-aligned box enclosing every vertex of every ring
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        let mut west = f64::INFINITY;
        let mut south = f64::INFINITY;
        let mut east = f64::NEG_INFINITY;
        let mut north = f64::NEG_INFINITY;

        for ring in &self.rings {
            for &(lon, lat) in ring {
                west = west.min(lon);
                east = east.max(lon);
                south = south.min(lat);
                north = north.max(lat);
            }
        }

        BoundingBox::new(south, west, north, east)
    }
}

fn parse_ring(value: &Value) -> Result<Vec<(f64, f64)>> {
    let points = value
        .as_array()
        .ok_or_else(|| Error::InvalidGeometry("ring must be an array of points".to_string()))?;

    let mut ring = Vec::with_capacity(points.len() + 1);
    for point in points {
        let pair = point
            .as_array()
            .filter(|p| p.len() >= 2)
            .ok_or_else(|| Error::InvalidGeometry("point must be a [lon, lat] pair".to_string()))?;
        let lon = pair[0]
            .as_f64()
            .ok_or_else(|| Error::InvalidGeometry("longitude must be a number".to_string()))?;
        let lat = pair[1]
            .as_f64()
            .ok_or_else(|| Error::InvalidGeometry("latitude must be a number".to_string()))?;

        if !lon.is_finite() || !lat.is_finite() || lon.abs() > 180.0 || lat.abs() > 90.0 {
            return Err(Error::InvalidGeometry(format!(
                "coordinate ({}, {}) outside WGS84 range",
                lon, lat
            )));
        }
        ring.push((lon, lat));
    }

    if ring.first() != ring.last() {
        if let Some(&first) = ring.first() {
            ring.push(first);
        }
    }
    if ring.len() < 4 {
        return Err(Error::InvalidGeometry(format!(
            "ring has {} points, need at least 4 including closure",
            ring.len()
        )));
    }

    Ok(ring)
}

/// Signed shoelace area of a closed ring, in square degrees
fn ring_area(ring: &[(f64, f64)]) -> f64 {
    let mut twice_area = 0.0;
    for pair in ring.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        twice_area += x0 * y1 - x1 * y0;
    }
    twice_area / 2.0
}
