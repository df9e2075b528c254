//! Request orchestration
//!
//! Runs geometry resolution, band acquisition, index computation and asset
//! emission in sequence for one request. Band source selection happens
//! here: live when configured, synthetic otherwise, and live failures
//! degrade to synthetic when fallback is allowed.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::assets::{AssetRecord, AssetWriter};
use crate::bands::{BandPair, BandSource, SentinelHub, SyntheticField, TimeWindow};
use crate::config::Config;
use crate::error::Result;
use crate::geometry::{grid, Polygon};
use crate::ndvi;
use crate::types::{BoundingBox, Statistics};

/// Everything the wire response needs about one completed request
#[derive(Debug)]
pub struct PipelineOutput {
    pub record: AssetRecord,
    pub statistics: Statistics,
    pub bounds: BoundingBox,
    /// Name of the band source that actually produced the data
    pub band_source: &'static str,
}

/// Runs the full pipeline for one GeoJSON geometry.
///
/// `live` is the optional live band source built once at startup; `None`
/// means synthetic-only operation.
pub async fn run(
    config: &Config,
    live: Option<&SentinelHub>,
    geometry: &Value,
) -> Result<PipelineOutput> {
    let polygon = Polygon::from_geojson(geometry)?;
    let bounds = polygon.bounding_box()?;
    let raster_grid = grid::resolve(&bounds, config)?;
    debug!(
        width = raster_grid.dims.width,
        height = raster_grid.dims.height,
        "resolved request grid"
    );

    let window = TimeWindow::from_config(config);
    let (bands, band_source) = acquire_bands(config, live, &bounds, &raster_grid, &window).await?;

    let raster = ndvi::compute(&bands);
    let record = AssetWriter::new(config).write(&raster, &raster_grid, bounds)?;
    info!(id = %record.id, source = band_source, "emitted asset set");

    Ok(PipelineOutput {
        statistics: raster.stats,
        bounds,
        record,
        band_source,
    })
}

async fn acquire_bands(
    config: &Config,
    live: Option<&SentinelHub>,
    bounds: &BoundingBox,
    raster_grid: &grid::RasterGrid,
    window: &TimeWindow,
) -> Result<(BandPair, &'static str)> {
    let primary = match live {
        Some(live) => BandSource::Live(live),
        None => {
            debug!("no live imagery configured, using synthetic bands");
            BandSource::Synthetic(SyntheticField)
        }
    };

    match primary.produce_bands(bounds, raster_grid, window).await {
        Ok(bands) => Ok((bands, primary.name())),
        Err(err)
            if matches!(&primary, BandSource::Live(_))
                && err.is_recoverable_upstream()
                && config.allow_synthetic_fallback =>
        {
            warn!(error = %err, "live imagery failed, falling back to synthetic bands");
            let fallback = BandSource::Synthetic(SyntheticField);
            let bands = fallback.produce_bands(bounds, raster_grid, window).await?;
            Ok((bands, fallback.name()))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SentinelCredentials;
    use crate::error::Error;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.output_dir = dir.path().join("ndvi");
        config
    }

    fn small_square() -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[
                [10.1815, 36.8065],
                [10.1835, 36.8065],
                [10.1835, 36.8085],
                [10.1815, 36.8085],
                [10.1815, 36.8065],
            ]]
        })
    }

    #[tokio::test]
    async fn test_synthetic_end_to_end() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let output = run(&config, None, &small_square()).await.unwrap();
        assert_eq!(output.band_source, "synthetic");
        assert!(output.record.raster_path.exists());
        assert!(output.record.overlay_path.exists());

        let [south, west, north, east] = output.bounds.to_array();
        assert!(south < north && west < east);

        let mean = output.statistics.mean.unwrap();
        assert!(mean > -1.0 && mean < 1.0);
    }

    #[tokio::test]
    async fn test_same_geometry_twice_distinct_assets() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);

        let first = run(&config, None, &small_square()).await.unwrap();
        let second = run(&config, None, &small_square()).await.unwrap();

        assert_ne!(first.record.id, second.record.id);
        // deterministic generation: identical statistics for identical input
        assert_eq!(first.statistics, second.statistics);
        let a = std::fs::read(&first.record.raster_path).unwrap();
        let b = std::fs::read(&second.record.raster_path).unwrap();
        assert_eq!(a.len(), b.len());
    }

    #[tokio::test]
    async fn test_degenerate_polygon_rejected_before_bands() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let geometry = json!({
            "type": "Polygon",
            "coordinates": [[
                [10.0, 36.0],
                [10.0, 36.0],
                [10.0, 36.0],
                [10.0, 36.0],
            ]]
        });

        let err = run(&config, None, &geometry).await.unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
        // nothing was written
        assert!(!config.output_dir.exists());
    }

    #[tokio::test]
    async fn test_oversized_bbox_rejected_before_bands() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let geometry = json!({
            "type": "Polygon",
            "coordinates": [[
                [0.0, 0.0],
                [10.0, 0.0],
                [10.0, 10.0],
                [0.0, 10.0],
                [0.0, 0.0],
            ]]
        });

        let err = run(&config, None, &geometry).await.unwrap_err();
        assert!(matches!(err, Error::GeometryTooLarge(_)));
        assert!(!config.output_dir.exists());
    }

    #[tokio::test]
    async fn test_live_failure_falls_back_to_synthetic() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.base_url = "http://127.0.0.1:9".to_string();
        config.request_timeout = Duration::from_millis(500);
        config.credentials = Some(SentinelCredentials::ClientCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        });

        let live = SentinelHub::from_config(&config).unwrap().unwrap();
        let output = run(&config, Some(&live), &small_square()).await.unwrap();
        assert_eq!(output.band_source, "synthetic");
        assert!(output.statistics.mean.is_some());
    }

    #[tokio::test]
    async fn test_live_failure_without_fallback_is_terminal() {
        let dir = TempDir::new().unwrap();
        let mut config = test_config(&dir);
        config.base_url = "http://127.0.0.1:9".to_string();
        config.request_timeout = Duration::from_millis(500);
        config.credentials = Some(SentinelCredentials::ClientCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        });
        config.allow_synthetic_fallback = false;

        let live = SentinelHub::from_config(&config).unwrap().unwrap();
        let err = run(&config, Some(&live), &small_square()).await.unwrap_err();
        assert!(err.is_recoverable_upstream());
        assert!(!config.output_dir.exists());
    }
}
