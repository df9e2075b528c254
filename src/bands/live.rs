//! Live band acquisition from the Sentinel Hub process API
//!
//! Requests Sentinel-2 L2A red and NIR reflectance plus the scene
//! classification and data mask for a bounding box and time window, as one
//! four-band float32 TIFF. Every failure maps to an upstream error class the
//! orchestrator can recover from by switching to the synthetic source.

use reqwest::{Client, StatusCode};
use serde_json::json;

use crate::config::{Config, SentinelCredentials};
use crate::error::{Error, Result};
use crate::formats::tiff::decoder;
use crate::geometry::RasterGrid;
use crate::mask;
use crate::types::BoundingBox;

use super::{BandPair, TimeWindow};

/// Sampling program sent to the process API
const EVALSCRIPT: &str = r#"//VERSION=3
function setup() {
  return {
    input: [{ bands: ["B04", "B08", "SCL", "dataMask"] }],
    output: { bands: 4, sampleType: "FLOAT32" }
  };
}

function evaluatePixel(sample) {
  return [sample.B04, sample.B08, sample.SCL, sample.dataMask];
}
"#;

/// Live band source backed by the Sentinel Hub process API
pub struct SentinelHub {
    http: Client,
    base_url: String,
    credentials: SentinelCredentials,
}

impl SentinelHub {
    /// Builds the live source from configuration, `None` when no credentials
    /// are present (the caller then runs synthetic-only).
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        let Some(credentials) = config.credentials.clone() else {
            return Ok(None);
        };
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::UpstreamUnavailable(format!("HTTP client setup failed: {}", e)))?;
        Ok(Some(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        }))
    }

    /// Fetches, decodes and masks the band pair for the grid
    pub async fn produce_bands(
        &self,
        bbox: &BoundingBox,
        grid: &RasterGrid,
        window: &TimeWindow,
    ) -> Result<BandPair> {
        let token = self.access_token().await?;
        let bytes = self.fetch_scene(&token, bbox, grid, window).await?;

        let scene = decoder::decode(&bytes)?;
        if scene.dims != grid.dims {
            return Err(Error::InvalidScene(format!(
                "scene is {}x{}, requested {}x{}",
                scene.dims.width, scene.dims.height, grid.dims.width, grid.dims.height
            )));
        }
        if scene.planes.len() != 4 {
            return Err(Error::InvalidScene(format!(
                "scene has {} bands, expected 4",
                scene.planes.len()
            )));
        }

        let mut planes = scene.planes.into_iter();
        let red = planes.next().unwrap_or_default();
        let nir = planes.next().unwrap_or_default();
        let scl = planes.next().unwrap_or_default();
        let data_mask = planes.next().unwrap_or_default();

        if data_mask.iter().all(|&v| v < 0.5) {
            return Err(Error::NoImagery(format!(
                "no acquisition covers the area between {} and {}",
                window.start, window.end
            )));
        }

        let mask = mask::validity_mask(&scl, &data_mask);
        BandPair::new(red, nir, Some(mask), scene.dims)
    }

    /// Resolves a bearer token: the OAuth client-credentials flow, or the
    /// pre-issued legacy instance token as-is.
    async fn access_token(&self) -> Result<String> {
        let (client_id, client_secret) = match &self.credentials {
            SentinelCredentials::InstanceToken { token } => return Ok(token.clone()),
            SentinelCredentials::ClientCredentials {
                client_id,
                client_secret,
            } => (client_id, client_secret),
        };

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
        ];
        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .form(&params)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::UpstreamAuth(
                "credentials rejected by token endpoint".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("bad token response: {}", e)))?;
        body.get("access_token")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| Error::UpstreamAuth("token response missing access_token".to_string()))
    }

    async fn fetch_scene(
        &self,
        token: &str,
        bbox: &BoundingBox,
        grid: &RasterGrid,
        window: &TimeWindow,
    ) -> Result<Vec<u8>> {
        let body = json!({
            "input": {
                "bounds": {
                    "bbox": [bbox.west, bbox.south, bbox.east, bbox.north],
                    "properties": {
                        "crs": "http://www.opengis.net/def/crs/EPSG/0/4326"
                    }
                },
                "data": [{
                    "type": "sentinel-2-l2a",
                    "dataFilter": {
                        "timeRange": {
                            "from": format!("{}T00:00:00Z", window.start),
                            "to": format!("{}T23:59:59Z", window.end)
                        },
                        "mosaickingOrder": "mostRecent"
                    }
                }]
            },
            "output": {
                "width": grid.dims.width,
                "height": grid.dims.height,
                "responses": [{
                    "identifier": "default",
                    "format": { "type": "image/tiff" }
                }]
            },
            "evalscript": EVALSCRIPT
        });

        let response = self
            .http
            .post(format!("{}/api/v1/process", self.base_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::UpstreamAuth(
                "token rejected by process endpoint".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "process endpoint returned {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("scene download failed: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

fn request_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::UpstreamUnavailable("upstream request timed out".to_string())
    } else {
        Error::UpstreamUnavailable(format!("upstream request failed: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn unreachable_config() -> Config {
        let mut config = Config::default();
        config.base_url = "http://127.0.0.1:9".to_string();
        config.request_timeout = Duration::from_millis(500);
        config.credentials = Some(SentinelCredentials::ClientCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        });
        config
    }

    #[test]
    fn test_from_config_without_credentials() {
        let source = SentinelHub::from_config(&Config::default()).unwrap();
        assert!(source.is_none());
    }

    #[test]
    fn test_from_config_with_credentials() {
        let source = SentinelHub::from_config(&unreachable_config()).unwrap();
        assert!(source.is_some());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_upstream_unavailable() {
        let config = unreachable_config();
        let source = SentinelHub::from_config(&config).unwrap().unwrap();
        let err = source.access_token().await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable(_)));
        assert!(err.is_recoverable_upstream());
    }

    #[tokio::test]
    async fn test_instance_token_used_directly() {
        let mut config = unreachable_config();
        config.credentials = Some(SentinelCredentials::InstanceToken {
            token: "legacy-token".to_string(),
        });
        let source = SentinelHub::from_config(&config).unwrap().unwrap();
        assert_eq!(source.access_token().await.unwrap(), "legacy-token");
    }
}
