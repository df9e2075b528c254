//! Compact decoder for float32 scenes
//!
//! Handles exactly the classic TIFFs the imagery service returns and this
//! crate writes: little- or big-endian, stripped, chunky sample layout,
//! 32-bit IEEE float samples, uncompressed or deflate strips. Anything else
//! is an invalid scene, not a decode attempt.

use std::collections::HashMap;

use crate::compression::Compression;
use crate::error::{Error, Result};
use crate::types::Dimensions;

use super::tags::{self, field_types};
use super::{BIGTIFF_MAGIC, TIFF_MAGIC};

/// Upper bound on decoded pixels, guards against absurd headers
const MAX_PIXELS: usize = 64 * 1024 * 1024;

/// Upper bound on samples per pixel
const MAX_SAMPLES: usize = 16;

/// A decoded multi-sample image, one plane per sample
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub dims: Dimensions,
    /// Row-major planes, deinterleaved from the chunky layout
    pub planes: Vec<Vec<f32>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    fn u16_at(&self, bytes: &[u8], offset: usize) -> Result<u16> {
        let b = bytes.get(offset..offset + 2).ok_or_else(truncated)?;
        Ok(match self {
            ByteOrder::Little => u16::from_le_bytes([b[0], b[1]]),
            ByteOrder::Big => u16::from_be_bytes([b[0], b[1]]),
        })
    }

    fn u32_at(&self, bytes: &[u8], offset: usize) -> Result<u32> {
        let b = bytes.get(offset..offset + 4).ok_or_else(truncated)?;
        let b = [b[0], b[1], b[2], b[3]];
        Ok(match self {
            ByteOrder::Little => u32::from_le_bytes(b),
            ByteOrder::Big => u32::from_be_bytes(b),
        })
    }

    fn f32_from(&self, b: [u8; 4]) -> f32 {
        match self {
            ByteOrder::Little => f32::from_le_bytes(b),
            ByteOrder::Big => f32::from_be_bytes(b),
        }
    }
}

fn truncated() -> Error {
    Error::InvalidScene("truncated TIFF data".to_string())
}

struct Entry {
    field_type: u16,
    count: u32,
    payload: [u8; 4],
}

/// Decodes a float32 scene into per-sample planes
pub fn decode(bytes: &[u8]) -> Result<DecodedImage> {
    let (order, entries) = parse_ifd(bytes)?;

    let width = require_single(bytes, order, &entries, tags::IMAGE_WIDTH)? as usize;
    let height = require_single(bytes, order, &entries, tags::IMAGE_LENGTH)? as usize;
    if width == 0
        || height == 0
        || width > MAX_PIXELS
        || height > MAX_PIXELS
        || width * height > MAX_PIXELS
    {
        return Err(Error::InvalidScene(format!(
            "unreasonable scene dimensions {}x{}",
            width, height
        )));
    }

    let bits = entry_values(bytes, order, require(&entries, tags::BITS_PER_SAMPLE)?)?;
    if bits.iter().any(|&b| b != 32) {
        return Err(Error::InvalidScene(format!(
            "only 32-bit samples supported, got {:?}",
            bits
        )));
    }
    let formats = entry_values(bytes, order, require(&entries, tags::SAMPLE_FORMAT)?)?;
    if formats.iter().any(|&f| f != 3) {
        return Err(Error::InvalidScene(
            "only IEEE float samples supported".to_string(),
        ));
    }

    let samples = optional_single(bytes, order, &entries, tags::SAMPLES_PER_PIXEL, 1)? as usize;
    if samples == 0 || samples > MAX_SAMPLES {
        return Err(Error::InvalidScene(format!(
            "unreasonable sample count {}",
            samples
        )));
    }
    let planar = optional_single(bytes, order, &entries, tags::PLANAR_CONFIGURATION, 1)?;
    if planar != 1 {
        return Err(Error::InvalidScene(
            "only chunky planar configuration supported".to_string(),
        ));
    }
    let predictor = optional_single(bytes, order, &entries, tags::PREDICTOR, 1)?;
    if predictor != 1 {
        return Err(Error::InvalidScene(format!(
            "unsupported predictor {}",
            predictor
        )));
    }

    let compression_tag = optional_single(bytes, order, &entries, tags::COMPRESSION, 1)?;
    let compression = Compression::from_tag(compression_tag)?;

    let rows_per_strip =
        optional_single(bytes, order, &entries, tags::ROWS_PER_STRIP, height as u64)? as usize;
    let rows_per_strip = rows_per_strip.clamp(1, height);

    let offsets = entry_values(bytes, order, require(&entries, tags::STRIP_OFFSETS)?)?;
    let counts = entry_values(bytes, order, require(&entries, tags::STRIP_BYTE_COUNTS)?)?;
    let expected_strips = height.div_ceil(rows_per_strip);
    if offsets.len() != counts.len() || offsets.len() != expected_strips {
        return Err(Error::InvalidScene(format!(
            "strip layout mismatch: {} offsets, {} counts, expected {} strips",
            offsets.len(),
            counts.len(),
            expected_strips
        )));
    }

    let mut planes = vec![Vec::with_capacity(width * height); samples];
    let mut row = 0usize;
    for (strip_index, (&offset, &count)) in offsets.iter().zip(counts.iter()).enumerate() {
        let rows_in_strip = rows_per_strip.min(height - row);
        row += rows_in_strip;

        let start = offset as usize;
        let end = start
            .checked_add(count as usize)
            .ok_or_else(truncated)?;
        let data = bytes.get(start..end).ok_or_else(truncated)?;
        let raw = compression.decompress(data).map_err(|e| {
            Error::InvalidScene(format!("strip {} decompression failed: {}", strip_index, e))
        })?;

        let expected = rows_in_strip * width * samples * 4;
        if raw.len() < expected {
            return Err(Error::InvalidScene(format!(
                "strip {} has {} bytes, expected {}",
                strip_index,
                raw.len(),
                expected
            )));
        }
        for (i, chunk) in raw[..expected].chunks_exact(4).enumerate() {
            let value = order.f32_from([chunk[0], chunk[1], chunk[2], chunk[3]]);
            planes[i % samples].push(value);
        }
    }

    Ok(DecodedImage {
        dims: Dimensions::new(width, height),
        planes,
    })
}

/// Lists the tags present in the main IFD, used by format tests
pub fn list_tags(bytes: &[u8]) -> Result<Vec<u16>> {
    let (_, entries) = parse_ifd(bytes)?;
    let mut tags: Vec<u16> = entries.keys().copied().collect();
    tags.sort_unstable();
    Ok(tags)
}

fn parse_ifd(bytes: &[u8]) -> Result<(ByteOrder, HashMap<u16, Entry>)> {
    let order = match bytes.get(0..2) {
        Some(b"II") => ByteOrder::Little,
        Some(b"MM") => ByteOrder::Big,
        _ => {
            return Err(Error::InvalidScene(
                "not a TIFF: bad byte-order marker".to_string(),
            ))
        }
    };
    let magic = order.u16_at(bytes, 2)?;
    if magic == BIGTIFF_MAGIC {
        return Err(Error::InvalidScene("BigTIFF scenes not supported".to_string()));
    }
    if magic != TIFF_MAGIC {
        return Err(Error::InvalidScene(format!("bad TIFF magic {}", magic)));
    }

    let ifd_offset = order.u32_at(bytes, 4)? as usize;
    let entry_count = order.u16_at(bytes, ifd_offset)? as usize;

    let mut entries = HashMap::with_capacity(entry_count);
    for i in 0..entry_count {
        let base = ifd_offset + 2 + i * 12;
        let tag = order.u16_at(bytes, base)?;
        let field_type = order.u16_at(bytes, base + 2)?;
        let count = order.u32_at(bytes, base + 4)?;
        let payload = bytes
            .get(base + 8..base + 12)
            .ok_or_else(truncated)?;
        entries.insert(
            tag,
            Entry {
                field_type,
                count,
                payload: [payload[0], payload[1], payload[2], payload[3]],
            },
        );
    }
    Ok((order, entries))
}

fn require<'a>(entries: &'a HashMap<u16, Entry>, tag: u16) -> Result<&'a Entry> {
    entries.get(&tag).ok_or_else(|| {
        Error::InvalidScene(format!("missing required tag {}", tags::tag_name(tag)))
    })
}

fn require_single(
    bytes: &[u8],
    order: ByteOrder,
    entries: &HashMap<u16, Entry>,
    tag: u16,
) -> Result<u64> {
    let values = entry_values(bytes, order, require(entries, tag)?)?;
    values.first().copied().ok_or_else(|| {
        Error::InvalidScene(format!("tag {} has no values", tags::tag_name(tag)))
    })
}

fn optional_single(
    bytes: &[u8],
    order: ByteOrder,
    entries: &HashMap<u16, Entry>,
    tag: u16,
    default: u64,
) -> Result<u64> {
    match entries.get(&tag) {
        Some(entry) => {
            let values = entry_values(bytes, order, entry)?;
            Ok(values.first().copied().unwrap_or(default))
        }
        None => Ok(default),
    }
}

/// Reads an entry's integer values, inline or from the external value area
fn entry_values(bytes: &[u8], order: ByteOrder, entry: &Entry) -> Result<Vec<u64>> {
    let value_size = field_types::size(entry.field_type);
    let count = entry.count as usize;
    let total = value_size * count;

    let inline_storage;
    let data: &[u8] = if total <= 4 {
        inline_storage = entry.payload;
        &inline_storage[..total]
    } else {
        let offset = order.u32_at(&entry.payload, 0)? as usize;
        bytes
            .get(offset..offset + total)
            .ok_or_else(truncated)?
    };

    let mut values = Vec::with_capacity(count);
    for i in 0..count {
        let at = i * value_size;
        let value = match entry.field_type {
            field_types::BYTE => data[at] as u64,
            field_types::SHORT => order.u16_at(data, at)? as u64,
            field_types::LONG => order.u32_at(data, at)? as u64,
            other => {
                return Err(Error::InvalidScene(format!(
                    "unsupported field type {} for integer tag",
                    other
                )))
            }
        };
        values.push(value);
    }
    Ok(values)
}
