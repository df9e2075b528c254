//! Deterministic synthetic band generation
//!
//! Stands in for the live imagery service in demos and as the fallback when
//! live acquisition fails. The field is a smooth function of the pixel grid
//! seeded by the bounding box centroid and extent: the same request always
//! reproduces the same bands bit for bit, and the derived index varies
//! spatially instead of collapsing to a constant.

use std::f64::consts::TAU;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::geometry::RasterGrid;
use crate::types::BoundingBox;

use super::BandPair;

/// Synthetic band source; carries no state, all variation comes from the box
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticField;

impl SyntheticField {
    /// Generates the red/NIR pair for the grid. Only fails on a zero-sized
    /// grid, which the geometry resolver never produces.
    pub fn produce_bands(&self, bbox: &BoundingBox, grid: &RasterGrid) -> Result<BandPair> {
        let dims = grid.dims;
        if dims.width == 0 || dims.height == 0 {
            return Err(Error::Computation(format!(
                "cannot synthesize a {}x{} grid",
                dims.width, dims.height
            )));
        }

        let (center_lon, center_lat) = bbox.center();
        let phase_u = (center_lon * 7.13).rem_euclid(1.0);
        let phase_v = (center_lat * 11.47).rem_euclid(1.0);
        let freq_u = 2.0 + (bbox.width() * 37.0).rem_euclid(3.0);
        let freq_v = 1.0 + (bbox.height() * 53.0).rem_euclid(3.0);

        let width = dims.width;
        let inv_w = 1.0 / width as f64;
        let inv_h = 1.0 / dims.height as f64;

        let mut red = vec![0.0f32; dims.pixel_count()];
        let mut nir = vec![0.0f32; dims.pixel_count()];

        red.par_chunks_mut(width)
            .zip(nir.par_chunks_mut(width))
            .enumerate()
            .for_each(|(row, (red_row, nir_row))| {
                let v = (row as f64 + 0.5) * inv_h;
                for col in 0..width {
                    let u = (col as f64 + 0.5) * inv_w;
                    let greenness = 0.5
                        + 0.3 * (TAU * (freq_u * u + phase_u)).sin()
                            * (TAU * (freq_v * v + phase_v)).cos()
                        + 0.2 * (TAU * (0.5 * u + 0.75 * v + phase_u * 0.5)).sin();
                    let greenness = greenness.clamp(0.0, 1.0);

                    red_row[col] = (0.06 + 0.22 * (1.0 - greenness)) as f32;
                    nir_row[col] = (0.12 + 0.50 * greenness) as f32;
                }
            });

        BandPair::new(red, nir, None, dims)
    }
}
