//! Asset emission
//!
//! Writes the georeferenced raster and the visual overlay under the output
//! directory, both named by one generated identifier, and returns their
//! locations. File contents are assembled in memory and written whole; a
//! failed write never leaves a partial asset set behind.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::formats::tiff::GeoTiffWriter;
use crate::geometry::RasterGrid;
use crate::ndvi::NdviRaster;
use crate::render;
use crate::types::BoundingBox;

/// Locations of one generated asset set
#[derive(Debug, Clone)]
pub struct AssetRecord {
    /// Generated identifier shared by both files
    pub id: String,
    pub raster_path: PathBuf,
    pub overlay_path: PathBuf,
    pub raster_url: String,
    pub overlay_url: String,
    /// Bounding box the overlay aligns to on a map
    pub bounds: BoundingBox,
}

/// Emits asset files for completed requests
pub struct AssetWriter {
    output_dir: PathBuf,
    public_base_url: String,
}

impl AssetWriter {
    pub fn new(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Writes both asset files and returns their record
    pub fn write(
        &self,
        ndvi: &NdviRaster,
        grid: &RasterGrid,
        bounds: BoundingBox,
    ) -> Result<AssetRecord> {
        fs::create_dir_all(&self.output_dir)
            .map_err(|e| write_failure(&self.output_dir, e))?;

        let id = Uuid::new_v4().simple().to_string();
        let raster_path = self.output_dir.join(format!("{}.tif", id));
        let overlay_path = self.output_dir.join(format!("{}.png", id));

        let tiff_bytes = GeoTiffWriter::new().encode(&ndvi.values, grid)?;

        let overlay = render::render_overlay(ndvi);
        let mut png_bytes = Vec::new();
        overlay
            .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|e| Error::WriteFailure(format!("overlay encoding failed: {}", e)))?;

        fs::write(&raster_path, &tiff_bytes).map_err(|e| write_failure(&raster_path, e))?;
        if let Err(e) = fs::write(&overlay_path, &png_bytes) {
            let _ = fs::remove_file(&raster_path);
            return Err(write_failure(&overlay_path, e));
        }

        Ok(AssetRecord {
            raster_url: self.public_url(&raster_path),
            overlay_url: self.public_url(&overlay_path),
            id,
            raster_path,
            overlay_path,
            bounds,
        })
    }

    fn public_url(&self, path: &Path) -> String {
        let relative = path.to_string_lossy().replace('\\', "/");
        format!("{}/{}", self.public_base_url, relative)
    }
}

fn write_failure(path: &Path, error: std::io::Error) -> Error {
    Error::WriteFailure(format!("{}: {}", path.display(), error))
}
