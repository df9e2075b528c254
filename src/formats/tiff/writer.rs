//! Georeferenced raster writing
//!
//! Emits a classic little-endian TIFF with a single float32 band in
//! deflate-compressed strips, anchored to geographic WGS84 through the
//! ModelPixelScale/ModelTiepoint tags and a GeoKey directory. The nodata
//! sentinel is recorded in the GDAL_NODATA tag so downstream GIS tools
//! honor the masked pixels.

use crate::compression::Compression;
use crate::error::{Error, Result};
use crate::geometry::RasterGrid;

use super::tags::{self, field_types, geo_keys};
use super::TIFF_MAGIC;

/// Value written into the GDAL_NODATA ASCII tag
pub const NODATA_TAG_VALUE: &str = "nan";

/// Citation recorded in the GeoAsciiParams tag
const WGS84_CITATION: &str = "WGS 84|";

/// Uncompressed strip size target
const STRIP_TARGET_BYTES: usize = 64 * 1024;

/// One IFD entry value, little-endian on the wire
enum TagValue {
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    Doubles(Vec<f64>),
    Ascii(String),
}

impl TagValue {
    fn field_type(&self) -> u16 {
        match self {
            TagValue::Shorts(_) => field_types::SHORT,
            TagValue::Longs(_) => field_types::LONG,
            TagValue::Doubles(_) => field_types::DOUBLE,
            TagValue::Ascii(_) => field_types::ASCII,
        }
    }

    fn count(&self) -> u32 {
        match self {
            TagValue::Shorts(v) => v.len() as u32,
            TagValue::Longs(v) => v.len() as u32,
            TagValue::Doubles(v) => v.len() as u32,
            // ASCII counts include the NUL terminator
            TagValue::Ascii(s) => s.len() as u32 + 1,
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        match self {
            TagValue::Shorts(values) => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
            TagValue::Longs(values) => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
            TagValue::Doubles(values) => values.iter().flat_map(|v| v.to_le_bytes()).collect(),
            TagValue::Ascii(s) => {
                let mut bytes = s.as_bytes().to_vec();
                bytes.push(0);
                bytes
            }
        }
    }
}

struct TagEntry {
    tag: u16,
    value: TagValue,
}

/// Writer for single-band float32 GeoTIFF rasters
pub struct GeoTiffWriter {
    compression: Compression,
}

impl Default for GeoTiffWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoTiffWriter {
    /// Creates a writer with deflate strip compression
    pub fn new() -> Self {
        Self {
            compression: Compression::Deflate,
        }
    }

    /// Creates a writer with explicit strip compression
    pub fn with_compression(compression: Compression) -> Self {
        Self { compression }
    }

    /// Encodes the raster into an in-memory TIFF file.
    ///
    /// `values` is row-major with the grid's north-west pixel first; NaN
    /// entries are carried through as the nodata sentinel.
    pub fn encode(&self, values: &[f32], grid: &RasterGrid) -> Result<Vec<u8>> {
        let dims = grid.dims;
        if values.len() != dims.pixel_count() {
            return Err(Error::Computation(format!(
                "raster has {} values, grid expects {}",
                values.len(),
                dims.pixel_count()
            )));
        }
        if dims.width == 0 || dims.height == 0 {
            return Err(Error::Computation("cannot encode an empty raster".to_string()));
        }

        let row_bytes = dims.width * 4;
        let rows_per_strip = (STRIP_TARGET_BYTES / row_bytes).clamp(1, dims.height);

        let mut strips = Vec::new();
        for chunk in values.chunks(rows_per_strip * dims.width) {
            let mut raw = Vec::with_capacity(chunk.len() * 4);
            for &v in chunk {
                raw.extend_from_slice(&v.to_le_bytes());
            }
            let compressed = self
                .compression
                .compress(&raw)
                .map_err(|e| Error::WriteFailure(format!("strip compression failed: {}", e)))?;
            strips.push(compressed);
        }

        // Layout: header | strip data | IFD | external value area
        let mut out = Vec::with_capacity(strips.iter().map(Vec::len).sum::<usize>() + 512);
        out.extend_from_slice(b"II");
        out.extend_from_slice(&TIFF_MAGIC.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());

        let mut strip_offsets = Vec::with_capacity(strips.len());
        let mut strip_counts = Vec::with_capacity(strips.len());
        for strip in &strips {
            strip_offsets.push(out.len() as u32);
            strip_counts.push(strip.len() as u32);
            out.extend_from_slice(strip);
        }
        if out.len() % 2 == 1 {
            out.push(0);
        }

        let entries = build_entries(
            grid,
            self.compression,
            rows_per_strip,
            strip_offsets,
            strip_counts,
        );

        let ifd_offset = out.len() as u32;
        out[4..8].copy_from_slice(&ifd_offset.to_le_bytes());
        write_ifd(&mut out, &entries);

        Ok(out)
    }
}

/// Builds the IFD entries in ascending tag order, as the format requires
fn build_entries(
    grid: &RasterGrid,
    compression: Compression,
    rows_per_strip: usize,
    strip_offsets: Vec<u32>,
    strip_counts: Vec<u32>,
) -> Vec<TagEntry> {
    let dims = grid.dims;
    let transform = grid.transform;

    let geo_key_directory = vec![
        // Header: version 1.1, revision 0, four keys follow
        1,
        1,
        0,
        4,
        geo_keys::MODEL_TYPE,
        0,
        1,
        geo_keys::MODEL_TYPE_GEOGRAPHIC,
        geo_keys::RASTER_TYPE,
        0,
        1,
        geo_keys::RASTER_PIXEL_IS_AREA,
        geo_keys::GEOGRAPHIC_TYPE,
        0,
        1,
        geo_keys::GCS_WGS84,
        geo_keys::GEOG_CITATION,
        tags::GEO_ASCII_PARAMS,
        WGS84_CITATION.len() as u16,
        0,
    ];

    vec![
        TagEntry {
            tag: tags::IMAGE_WIDTH,
            value: TagValue::Longs(vec![dims.width as u32]),
        },
        TagEntry {
            tag: tags::IMAGE_LENGTH,
            value: TagValue::Longs(vec![dims.height as u32]),
        },
        TagEntry {
            tag: tags::BITS_PER_SAMPLE,
            value: TagValue::Shorts(vec![32]),
        },
        TagEntry {
            tag: tags::COMPRESSION,
            value: TagValue::Shorts(vec![compression.tag_value()]),
        },
        TagEntry {
            tag: tags::PHOTOMETRIC_INTERPRETATION,
            // BlackIsZero
            value: TagValue::Shorts(vec![1]),
        },
        TagEntry {
            tag: tags::STRIP_OFFSETS,
            value: TagValue::Longs(strip_offsets),
        },
        TagEntry {
            tag: tags::SAMPLES_PER_PIXEL,
            value: TagValue::Shorts(vec![1]),
        },
        TagEntry {
            tag: tags::ROWS_PER_STRIP,
            value: TagValue::Longs(vec![rows_per_strip as u32]),
        },
        TagEntry {
            tag: tags::STRIP_BYTE_COUNTS,
            value: TagValue::Longs(strip_counts),
        },
        TagEntry {
            tag: tags::SAMPLE_FORMAT,
            // IEEE floating point
            value: TagValue::Shorts(vec![3]),
        },
        TagEntry {
            tag: tags::MODEL_PIXEL_SCALE,
            value: TagValue::Doubles(vec![
                transform.pixel_width,
                transform.pixel_height.abs(),
                0.0,
            ]),
        },
        TagEntry {
            tag: tags::MODEL_TIEPOINT,
            value: TagValue::Doubles(vec![
                0.0,
                0.0,
                0.0,
                transform.origin_lon,
                transform.origin_lat,
                0.0,
            ]),
        },
        TagEntry {
            tag: tags::GEO_KEY_DIRECTORY,
            value: TagValue::Shorts(geo_key_directory),
        },
        TagEntry {
            tag: tags::GEO_ASCII_PARAMS,
            value: TagValue::Ascii(WGS84_CITATION.to_string()),
        },
        TagEntry {
            tag: tags::GDAL_NODATA,
            value: TagValue::Ascii(NODATA_TAG_VALUE.to_string()),
        },
    ]
}

/// Appends the IFD entry table followed by its external value area
fn write_ifd(out: &mut Vec<u8>, entries: &[TagEntry]) {
    let ifd_offset = out.len();
    let table_len = 2 + entries.len() * 12 + 4;
    let mut external_offset = ifd_offset + table_len;
    let mut externals: Vec<u8> = Vec::new();

    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for entry in entries {
        out.extend_from_slice(&entry.tag.to_le_bytes());
        out.extend_from_slice(&entry.value.field_type().to_le_bytes());
        out.extend_from_slice(&entry.value.count().to_le_bytes());

        let payload = entry.value.to_bytes();
        if payload.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..payload.len()].copy_from_slice(&payload);
            out.extend_from_slice(&inline);
        } else {
            out.extend_from_slice(&(external_offset as u32).to_le_bytes());
            externals.extend_from_slice(&payload);
            external_offset += payload.len();
            // keep value offsets word-aligned
            if payload.len() % 2 == 1 {
                externals.push(0);
                external_offset += 1;
            }
        }
    }
    // no next IFD
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&externals);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::formats::tiff::decoder;
    use crate::geometry::grid;
    use crate::types::BoundingBox;

    fn test_grid() -> RasterGrid {
        let bbox = BoundingBox::new(36.80, 10.18, 36.81, 10.19).unwrap();
        grid::resolve(&bbox, &Config::default()).unwrap()
    }

    #[test]
    fn test_header_and_magic() {
        let grid = test_grid();
        let values = vec![0.5f32; grid.dims.pixel_count()];
        let bytes = GeoTiffWriter::new().encode(&values, &grid).unwrap();

        assert_eq!(&bytes[0..2], b"II");
        assert_eq!(u16::from_le_bytes([bytes[2], bytes[3]]), TIFF_MAGIC);
    }

    #[test]
    fn test_round_trip_through_decoder() {
        let grid = test_grid();
        let mut values = vec![0.0f32; grid.dims.pixel_count()];
        for (i, v) in values.iter_mut().enumerate() {
            *v = (i as f32 / 1000.0).sin();
        }
        values[7] = f32::NAN;

        let bytes = GeoTiffWriter::new().encode(&values, &grid).unwrap();
        let decoded = decoder::decode(&bytes).unwrap();

        assert_eq!(decoded.dims, grid.dims);
        assert_eq!(decoded.planes.len(), 1);
        for (a, b) in decoded.planes[0].iter().zip(values.iter()) {
            if b.is_nan() {
                assert!(a.is_nan());
            } else {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_uncompressed_round_trip() {
        let grid = test_grid();
        let values = vec![0.25f32; grid.dims.pixel_count()];
        let writer = GeoTiffWriter::with_compression(Compression::None);
        let bytes = writer.encode(&values, &grid).unwrap();
        let decoded = decoder::decode(&bytes).unwrap();
        assert_eq!(decoded.planes[0], values);
    }

    #[test]
    fn test_geo_tags_present() {
        let grid = test_grid();
        let values = vec![0.5f32; grid.dims.pixel_count()];
        let bytes = GeoTiffWriter::new().encode(&values, &grid).unwrap();
        let entries = decoder::list_tags(&bytes).unwrap();

        for tag in [
            tags::MODEL_PIXEL_SCALE,
            tags::MODEL_TIEPOINT,
            tags::GEO_KEY_DIRECTORY,
            tags::GEO_ASCII_PARAMS,
            tags::GDAL_NODATA,
        ] {
            assert!(entries.contains(&tag), "missing tag {}", tags::tag_name(tag));
        }
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let grid = test_grid();
        let values = vec![0.5f32; 3];
        assert!(GeoTiffWriter::new().encode(&values, &grid).is_err());
    }
}
