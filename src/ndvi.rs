//! NDVI computation and statistics
//!
//! Computes `(nir - red) / (nir + red)` per pixel under the validity mask.
//! Invalid pixels carry a NaN sentinel distinguishable from any valid value;
//! a zero denominator always invalidates the pixel instead of raising.

use rayon::prelude::*;

use crate::bands::BandPair;
use crate::types::{Dimensions, Statistics};

/// Sentinel value marking invalid pixels in the output raster
pub const NODATA: f32 = f32::NAN;

/// Computed index raster with derived statistics
#[derive(Debug, Clone)]
pub struct NdviRaster {
    pub values: Vec<f32>,
    pub dims: Dimensions,
    pub stats: Statistics,
}

/// Computes the index raster for a band pair.
///
/// A pixel is valid when the mask allows it, both reflectances are finite
/// and non-negative, and `nir + red` is non-zero; everything else becomes
/// the sentinel. With non-negative inputs every valid output lies in
/// [-1, 1] without clamping.
pub fn compute(bands: &BandPair) -> NdviRaster {
    let width = bands.dims.width.max(1);
    let mut values = vec![NODATA; bands.dims.pixel_count()];

    values
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, out_row)| {
            let base = row * width;
            for (col, out) in out_row.iter_mut().enumerate() {
                let i = base + col;
                let red = bands.red[i];
                let nir = bands.nir[i];
                let allowed = bands.mask.as_ref().map_or(true, |mask| mask[i]);

                if allowed && red.is_finite() && nir.is_finite() && red >= 0.0 && nir >= 0.0 {
                    let sum = nir + red;
                    if sum != 0.0 {
                        *out = (nir - red) / sum;
                    }
                }
            }
        });

    let stats = statistics(&values);
    NdviRaster {
        values,
        dims: bands.dims,
        stats,
    }
}

/// Min, max and mean over the valid (non-NaN) pixels, `None` when empty
pub fn statistics(values: &[f32]) -> Statistics {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0f64;
    let mut count = 0u64;

    for &v in values {
        if v.is_nan() {
            continue;
        }
        let v = v as f64;
        min = min.min(v);
        max = max.max(v);
        sum += v;
        count += 1;
    }

    if count == 0 {
        Statistics::default()
    } else {
        Statistics {
            min: Some(min),
            max: Some(max),
            mean: Some(sum / count as f64),
        }
    }
}
