use serde::{Deserialize, Serialize};

use crate::types::Statistics;

#[derive(Debug, Deserialize)]
pub struct NdviRequest {
    pub geometry: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct NdviResponse {
    pub status: &'static str,
    pub ndvi_file: String,
    pub ndvi_overlay_url: String,
    pub bounds: [f64; 4],
    pub statistics: StatisticsBody,
}

#[derive(Debug, Serialize)]
pub struct StatisticsBody {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl From<Statistics> for StatisticsBody {
    fn from(stats: Statistics) -> Self {
        Self {
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}
