//! Pipeline configuration
//!
//! All knobs are collected into one immutable [`Config`] that is passed
//! explicitly into the pipeline. The binaries build it from the environment;
//! tests build it directly.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;

/// Default Sentinel Hub service endpoint
pub const DEFAULT_BASE_URL: &str = "https://services.sentinel-hub.com";

/// Credentials for the live imagery service
#[derive(Debug, Clone)]
pub enum SentinelCredentials {
    /// OAuth client-credentials flow
    ClientCredentials {
        client_id: String,
        client_secret: String,
    },
    /// Legacy pre-issued instance token, used directly as a bearer token
    InstanceToken { token: String },
}

/// Immutable configuration for one service instance
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory where generated assets are written
    pub output_dir: PathBuf,
    /// Root directory served under `/static`
    pub static_dir: PathBuf,
    /// Prefix for externally-servable asset URLs; empty means relative URLs
    pub public_base_url: String,
    /// Target ground resolution in metres, converted to a degree step
    pub resolution_m: f64,
    /// Upper bound on either grid axis; exceeding it coarsens the resolution
    pub max_grid_dim: usize,
    /// Lower bound on either grid axis
    pub min_grid_dim: usize,
    /// Maximum bounding-box span per axis in degrees
    pub max_span_deg: f64,
    /// Time window length when no explicit dates are configured
    pub lookback_days: i64,
    /// Explicit window start date
    pub time_start: Option<NaiveDate>,
    /// Explicit window end date
    pub time_end: Option<NaiveDate>,
    /// Sentinel Hub service endpoint
    pub base_url: String,
    /// Live credentials; `None` selects the synthetic band source
    pub credentials: Option<SentinelCredentials>,
    /// Whether live failures degrade to synthetic bands instead of erroring
    pub allow_synthetic_fallback: bool,
    /// Total budget for one upstream HTTP request
    pub request_timeout: Duration,
    /// Listen address for the API server binary
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("static/ndvi"),
            static_dir: PathBuf::from("static"),
            public_base_url: String::new(),
            resolution_m: 10.0,
            max_grid_dim: 2048,
            min_grid_dim: 32,
            max_span_deg: 2.0,
            lookback_days: 30,
            time_start: None,
            time_end: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            allow_synthetic_fallback: true,
            request_timeout: Duration::from_secs(30),
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl Config {
    /// Builds a configuration from environment variables, using defaults for
    /// anything unset. Credential selection mirrors the two supported
    /// authentication methods: a client id/secret pair wins over an instance
    /// token when both are present.
    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Some(dir) = env_nonempty("NDVI_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = env_nonempty("NDVI_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(base) = env_nonempty("NDVI_PUBLIC_BASE_URL") {
            config.public_base_url = base;
        }
        if let Some(res) = parse_env("SENTINELHUB_RESOLUTION") {
            config.resolution_m = res;
        }
        if let Some(days) = parse_env("SENTINELHUB_LOOKBACK_DAYS") {
            config.lookback_days = days;
        }
        config.time_start = env_nonempty("SENTINELHUB_TIME_START")
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());
        config.time_end = env_nonempty("SENTINELHUB_TIME_END")
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());
        if let Some(base) = env_nonempty("SENTINELHUB_BASE_URL") {
            config.base_url = base;
        }

        let client_id = env_nonempty("SENTINELHUB_CLIENT_ID");
        let client_secret = env_nonempty("SENTINELHUB_CLIENT_SECRET");
        let instance_id = env_nonempty("SENTINELHUB_INSTANCE_ID");
        config.credentials = match (client_id, client_secret, instance_id) {
            (Some(client_id), Some(client_secret), _) => {
                Some(SentinelCredentials::ClientCredentials {
                    client_id,
                    client_secret,
                })
            }
            (_, _, Some(token)) => Some(SentinelCredentials::InstanceToken { token }),
            _ => None,
        };

        if env_nonempty("NDVI_DISABLE_FALLBACK").is_some() {
            config.allow_synthetic_fallback = false;
        }
        if let Some(secs) = parse_env("NDVI_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(addr) = env_nonempty("BIND_ADDR") {
            config.bind_addr = addr;
        }

        config
    }

    /// Returns whether a live band source is configured
    pub fn live_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_nonempty(key).and_then(|v| v.parse().ok())
}
