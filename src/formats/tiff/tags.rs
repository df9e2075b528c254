//! TIFF tag constants

/// Image width in pixels
pub const IMAGE_WIDTH: u16 = 256;

/// Image height in pixels
pub const IMAGE_LENGTH: u16 = 257;

/// Bits per sample
pub const BITS_PER_SAMPLE: u16 = 258;

/// Compression scheme
pub const COMPRESSION: u16 = 259;

/// Photometric interpretation
pub const PHOTOMETRIC_INTERPRETATION: u16 = 262;

/// Strip offsets
pub const STRIP_OFFSETS: u16 = 273;

/// Samples per pixel
pub const SAMPLES_PER_PIXEL: u16 = 277;

/// Rows per strip
pub const ROWS_PER_STRIP: u16 = 278;

/// Strip byte counts
pub const STRIP_BYTE_COUNTS: u16 = 279;

/// Planar configuration
pub const PLANAR_CONFIGURATION: u16 = 284;

/// Predictor
pub const PREDICTOR: u16 = 317;

/// Sample format
pub const SAMPLE_FORMAT: u16 = 339;

/// GeoTIFF ModelPixelScaleTag
pub const MODEL_PIXEL_SCALE: u16 = 33550;

/// GeoTIFF ModelTiepointTag
pub const MODEL_TIEPOINT: u16 = 33922;

/// GeoTIFF GeoKeyDirectoryTag
pub const GEO_KEY_DIRECTORY: u16 = 34735;

/// GeoTIFF GeoAsciiParamsTag
pub const GEO_ASCII_PARAMS: u16 = 34737;

/// GDAL no data value
pub const GDAL_NODATA: u16 = 42113;

/// Returns the name of a TIFF tag
pub fn tag_name(tag: u16) -> &'static str {
    match tag {
        IMAGE_WIDTH => "ImageWidth",
        IMAGE_LENGTH => "ImageLength",
        BITS_PER_SAMPLE => "BitsPerSample",
        COMPRESSION => "Compression",
        PHOTOMETRIC_INTERPRETATION => "PhotometricInterpretation",
        STRIP_OFFSETS => "StripOffsets",
        SAMPLES_PER_PIXEL => "SamplesPerPixel",
        ROWS_PER_STRIP => "RowsPerStrip",
        STRIP_BYTE_COUNTS => "StripByteCounts",
        PLANAR_CONFIGURATION => "PlanarConfiguration",
        PREDICTOR => "Predictor",
        SAMPLE_FORMAT => "SampleFormat",
        MODEL_PIXEL_SCALE => "ModelPixelScale",
        MODEL_TIEPOINT => "ModelTiepoint",
        GEO_KEY_DIRECTORY => "GeoKeyDirectory",
        GEO_ASCII_PARAMS => "GeoAsciiParams",
        GDAL_NODATA => "GDAL_NODATA",
        _ => "Unknown",
    }
}

/// Field type constants
pub mod field_types {
    /// BYTE (8-bit unsigned)
    pub const BYTE: u16 = 1;

    /// ASCII string
    pub const ASCII: u16 = 2;

    /// SHORT (16-bit unsigned)
    pub const SHORT: u16 = 3;

    /// LONG (32-bit unsigned)
    pub const LONG: u16 = 4;

    /// RATIONAL (two LONGs: numerator, denominator)
    pub const RATIONAL: u16 = 5;

    /// FLOAT (32-bit IEEE float)
    pub const FLOAT: u16 = 11;

    /// DOUBLE (64-bit IEEE double)
    pub const DOUBLE: u16 = 12;

    /// Returns the size in bytes of one value of this field type
    pub fn size(field_type: u16) -> usize {
        match field_type {
            BYTE | ASCII => 1,
            SHORT => 2,
            LONG | FLOAT => 4,
            RATIONAL | DOUBLE => 8,
            _ => 1,
        }
    }
}

/// GeoKey constants for the GeoKeyDirectory
pub mod geo_keys {
    /// GTModelTypeGeoKey
    pub const MODEL_TYPE: u16 = 1024;

    /// GTRasterTypeGeoKey
    pub const RASTER_TYPE: u16 = 1025;

    /// GeographicTypeGeoKey
    pub const GEOGRAPHIC_TYPE: u16 = 2048;

    /// GeogCitationGeoKey
    pub const GEOG_CITATION: u16 = 2049;

    /// ModelType value for geographic coordinate systems
    pub const MODEL_TYPE_GEOGRAPHIC: u16 = 2;

    /// RasterType value for area pixels
    pub const RASTER_PIXEL_IS_AREA: u16 = 1;

    /// EPSG code for geographic WGS84
    pub const GCS_WGS84: u16 = 4326;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name() {
        assert_eq!(tag_name(IMAGE_WIDTH), "ImageWidth");
        assert_eq!(tag_name(GEO_KEY_DIRECTORY), "GeoKeyDirectory");
        assert_eq!(tag_name(9999), "Unknown");
    }

    #[test]
    fn test_field_type_size() {
        assert_eq!(field_types::size(field_types::BYTE), 1);
        assert_eq!(field_types::size(field_types::SHORT), 2);
        assert_eq!(field_types::size(field_types::LONG), 4);
        assert_eq!(field_types::size(field_types::DOUBLE), 8);
    }
}
