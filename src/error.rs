//! Error types for verdant-rasterizer

use std::fmt;
use std::io;

/// Result type for verdant-rasterizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while producing an NDVI asset set
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(io::Error),

    /// Rejected input geometry (not a polygon, open ring, degenerate area)
    InvalidGeometry(String),

    /// Bounding box exceeds the configured span ceiling
    GeometryTooLarge(String),

    /// Upstream imagery service rejected the credentials
    UpstreamAuth(String),

    /// Upstream imagery service unreachable or failing
    UpstreamUnavailable(String),

    /// Upstream returned no usable imagery for the time window
    NoImagery(String),

    /// Upstream returned a scene we could not decode
    InvalidScene(String),

    /// Asset files could not be written
    WriteFailure(String),

    /// Unexpected numeric or shape failure inside the pipeline
    Computation(String),
}

impl Error {
    /// Returns whether this failure may be recovered by falling back to the
    /// synthetic band source. Only failures of the live band provider qualify.
    pub fn is_recoverable_upstream(&self) -> bool {
        matches!(
            self,
            Error::UpstreamAuth(_)
                | Error::UpstreamUnavailable(_)
                | Error::NoImagery(_)
                | Error::InvalidScene(_)
        )
    }

    /// Returns whether this failure was caused by the client's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidGeometry(_) | Error::GeometryTooLarge(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
            Error::GeometryTooLarge(msg) => write!(f, "Geometry too large: {}", msg),
            Error::UpstreamAuth(msg) => write!(f, "Upstream authentication failed: {}", msg),
            Error::UpstreamUnavailable(msg) => write!(f, "Upstream unavailable: {}", msg),
            Error::NoImagery(msg) => write!(f, "No imagery found: {}", msg),
            Error::InvalidScene(msg) => write!(f, "Invalid scene data: {}", msg),
            Error::WriteFailure(msg) => write!(f, "Write failure: {}", msg),
            Error::Computation(msg) => write!(f, "Computation error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}
