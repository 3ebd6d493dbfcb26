use std::path::PathBuf;

use thiserror::Error;

/// Rejected configuration. Raised at load or engine construction, never on
/// the render path.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid range for {name}: min={min} max={max}")]
    InvalidRange { name: &'static str, min: f32, max: f32 },
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} must be within [0, {max}] to keep the filter stable, got {value}")]
    UnstableBandwidth {
        name: &'static str,
        value: f32,
        max: f32,
    },
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfBounds {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[cfg(feature = "serde")]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Rejected raw sample at the upload boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("sample has no channels")]
    NoChannels,
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),
    #[error("sample length {len} is not a whole number of {channels}-channel frames")]
    PartialFrame { len: usize, channels: usize },
}
