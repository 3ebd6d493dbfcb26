//! Low-level DSP primitives used by the generators and the conditioner.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! embed directly inside generator structs. They stay focused on the
//! signal-processing math; triggering and parameter drawing live one layer up.

/// Geometric decay constants and the denormal floor.
pub mod decay;
/// Resonant two-pass state-variable filter.
pub mod filter;
/// Seeded linear-congruential noise source.
pub mod random;

pub use filter::{
    cutoff_coefficient, FilterOutputs, FilterTap, ResonantSvf, MAX_STABLE_BANDWIDTH,
};
pub use random::NoiseSource;
