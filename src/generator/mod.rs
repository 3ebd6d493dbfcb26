//! Envelope generators that turn contact data into filtered noise.
//!
//! Both generators are driven one sample at a time by the render driver and
//! share its excitation: the driver draws one noise value per sample and
//! hands it to each generator, so a fixed seed reproduces the whole mix.

/// Sustained, speed-driven grain texture.
pub mod friction;
/// Decaying band-passed burst per collision.
pub mod impact;

pub use friction::FrictionEnvelope;
pub use impact::ImpactEnvelope;
