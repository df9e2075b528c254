//! Raster file format support

pub mod tiff;
