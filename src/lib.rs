pub mod conditioner; // Offline sample filtering and normalization
pub mod config;
pub mod contact; // Physics → audio handoff
pub mod dsp;
pub mod engine; // Render callback entry points
pub mod error;
pub mod generator; // Impact and friction envelopes

pub use config::ContactNoiseConfig;
pub use error::{ConfigError, SampleError};

/// Largest block the demo host renders at once.
pub const MAX_BLOCK_SIZE: usize = 2048;
