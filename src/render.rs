//! Overlay rendering
//!
//! Linearly contrast-stretches the index raster between its valid extremes
//! into an 8-bit RGBA image. Invalid pixels are fully transparent so the
//! overlay composites cleanly onto a basemap; pixel (0,0) is the grid's
//! north-west corner, which makes the image's display bounds exactly the
//! request's bounding box.

use image::{Rgba, RgbaImage};

use crate::ndvi::NdviRaster;

/// Vegetation color ramp, brown through yellow to deep green
const RAMP: &[(f32, [u8; 3])] = &[
    (0.0, [120, 70, 20]),
    (0.3, [200, 170, 60]),
    (0.5, [240, 230, 100]),
    (0.7, [100, 180, 50]),
    (1.0, [10, 100, 20]),
];

/// Renders the raster into an RGBA overlay image
pub fn render_overlay(ndvi: &NdviRaster) -> RgbaImage {
    let (min, max) = stretch_range(ndvi);
    let span = max - min;

    let width = ndvi.dims.width as u32;
    let height = ndvi.dims.height as u32;
    let mut image = RgbaImage::new(width, height);

    for (i, &value) in ndvi.values.iter().enumerate() {
        let x = (i % ndvi.dims.width) as u32;
        let y = (i / ndvi.dims.width) as u32;
        let pixel = if value.is_nan() {
            Rgba([0, 0, 0, 0])
        } else {
            let t = ((value as f64 - min) / span).clamp(0.0, 1.0) as f32;
            let [r, g, b] = ramp_color(t);
            Rgba([r, g, b, 255])
        };
        image.put_pixel(x, y, pixel);
    }

    image
}

/// Valid min/max of the raster, or the fixed [-1, 1] stretch when the range
/// is degenerate (constant raster or no valid pixels)
fn stretch_range(ndvi: &NdviRaster) -> (f64, f64) {
    match (ndvi.stats.min, ndvi.stats.max) {
        (Some(min), Some(max)) if max > min => (min, max),
        _ => (-1.0, 1.0),
    }
}

/// Piecewise-linear interpolation over the color ramp
fn ramp_color(t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    for pair in RAMP.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let local = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            let mut color = [0u8; 3];
            for (channel, slot) in color.iter_mut().enumerate() {
                let v = c0[channel] as f32 + local * (c1[channel] as f32 - c0[channel] as f32);
                *slot = v.round() as u8;
            }
            return color;
        }
    }
    RAMP[RAMP.len() - 1].1
}
