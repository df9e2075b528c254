//! Strip compression for raster file I/O

pub mod deflate;

use crate::error::{Error, Result};

/// Compression schemes supported for generated and decoded rasters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// No compression
    None,
    /// Deflate/ZIP compression
    Deflate,
}

impl Compression {
    /// Creates compression from a TIFF compression tag value
    pub fn from_tag(value: u64) -> Result<Self> {
        match value {
            1 => Ok(Compression::None),
            8 => Ok(Compression::Deflate),
            _ => Err(Error::InvalidScene(format!(
                "unsupported compression type {}",
                value
            ))),
        }
    }

    /// TIFF compression tag value for this scheme
    pub fn tag_value(&self) -> u16 {
        match self {
            Compression::None => 1,
            Compression::Deflate => 8,
        }
    }

    /// Compresses strip data
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Compression::None => Ok(data.to_vec()),
            Compression::Deflate => deflate::compress(data),
        }
    }

    /// Decompresses strip data
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Compression::None => Ok(data.to_vec()),
            Compression::Deflate => deflate::decompress(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_from_tag() {
        assert_eq!(Compression::from_tag(1).unwrap(), Compression::None);
        assert_eq!(Compression::from_tag(8).unwrap(), Compression::Deflate);
        assert!(Compression::from_tag(5).is_err());
    }

    #[test]
    fn test_tag_value_round_trip() {
        for scheme in [Compression::None, Compression::Deflate] {
            assert_eq!(
                Compression::from_tag(scheme.tag_value() as u64).unwrap(),
                scheme
            );
        }
    }

    #[test]
    fn test_no_compression() {
        let data = vec![1u8, 2, 3, 4];
        assert_eq!(Compression::None.compress(&data).unwrap(), data);
        assert_eq!(Compression::None.decompress(&data).unwrap(), data);
    }

    #[test]
    fn test_deflate_round_trip() {
        let data: Vec<u8> = (0..1024).map(|i| (i % 251) as u8).collect();
        let compressed = Compression::Deflate.compress(&data).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(Compression::Deflate.decompress(&compressed).unwrap(), data);
    }
}
