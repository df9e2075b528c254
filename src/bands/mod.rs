//! Spectral band acquisition
//!
//! Two sources produce the same shape of result: [`live::SentinelHub`]
//! fetches real Sentinel-2 reflectance for a bounding box and time window,
//! and [`synthetic::SyntheticField`] deterministically generates plausible
//! values when no live source is configured or it fails. The orchestrator
//! picks the variant; callers only see [`BandPair`].

pub mod live;
pub mod synthetic;

pub use live::SentinelHub;
pub use synthetic::SyntheticField;

use chrono::{Duration, NaiveDate, Utc};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geometry::RasterGrid;
use crate::types::{BoundingBox, Dimensions};

/// Two equal-shaped reflectance bands plus an optional validity mask.
///
/// `mask == None` means every pixel is usable (the synthetic path has no
/// classification layer to mask against).
#[derive(Debug, Clone)]
pub struct BandPair {
    pub red: Vec<f32>,
    pub nir: Vec<f32>,
    pub mask: Option<Vec<bool>>,
    pub dims: Dimensions,
}

impl BandPair {
    /// Creates a band pair, validating that every layer matches the grid shape
    pub fn new(
        red: Vec<f32>,
        nir: Vec<f32>,
        mask: Option<Vec<bool>>,
        dims: Dimensions,
    ) -> Result<Self> {
        let expected = dims.pixel_count();
        if red.len() != expected || nir.len() != expected {
            return Err(Error::Computation(format!(
                "band shape mismatch: red={}, nir={}, expected {}",
                red.len(),
                nir.len(),
                expected
            )));
        }
        if let Some(mask) = &mask {
            if mask.len() != expected {
                return Err(Error::Computation(format!(
                    "mask shape mismatch: {} vs {}",
                    mask.len(),
                    expected
                )));
            }
        }
        Ok(Self { red, nir, mask, dims })
    }
}

/// Acquisition time window, inclusive dates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TimeWindow {
    /// Explicit dates from configuration, or the most recent
    /// `lookback_days` ending today
    pub fn from_config(config: &Config) -> Self {
        match (config.time_start, config.time_end) {
            (Some(start), Some(end)) => Self { start, end },
            _ => {
                let end = Utc::now().date_naive();
                let start = end - Duration::days(config.lookback_days);
                Self { start, end }
            }
        }
    }
}

/// Band source selected at orchestration time from configuration.
///
/// The live variant borrows the process-wide Sentinel Hub client; the
/// synthetic variant is stateless.
pub enum BandSource<'a> {
    Live(&'a SentinelHub),
    Synthetic(SyntheticField),
}

impl BandSource<'_> {
    /// Produces the red/NIR band pair for the given area
    pub async fn produce_bands(
        &self,
        bbox: &BoundingBox,
        grid: &RasterGrid,
        window: &TimeWindow,
    ) -> Result<BandPair> {
        match self {
            BandSource::Live(source) => source.produce_bands(bbox, grid, window).await,
            BandSource::Synthetic(source) => source.produce_bands(bbox, grid),
        }
    }

    /// Short name used in logs and responses
    pub fn name(&self) -> &'static str {
        match self {
            BandSource::Live(_) => "sentinel-hub",
            BandSource::Synthetic(_) => "synthetic",
        }
    }
}
