//! GeoTIFF writing and scene decoding
//!
//! Self-contained classic-TIFF support: a writer that emits the
//! georeferenced NDVI raster with deflate strips and WGS84 GeoTIFF keys,
//! and a compact decoder for the float32 scenes the imagery service returns.

pub mod decoder;
pub mod tags;
pub mod writer;

pub use decoder::{decode, DecodedImage};
pub use writer::GeoTiffWriter;

/// TIFF magic number (42)
pub const TIFF_MAGIC: u16 = 42;

/// BigTIFF magic number (43), recognized only to reject it
pub const BIGTIFF_MAGIC: u16 = 43;
