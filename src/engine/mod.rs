//! Render-side entry points the host audio callback calls into.
//!
//! Both renderers add into an interleaved buffer and never allocate, lock or
//! log once constructed, so they can be called straight from a device
//! callback. Mixing several of them is just calling `render` on each with the
//! same buffer.

/// Polyphonic pool of independent collision bursts.
#[cfg(feature = "rtrb")]
pub mod bank;
/// Per-buffer loop driving the impact and friction envelopes.
pub mod driver;

#[cfg(feature = "rtrb")]
pub use bank::ImpactBank;
pub use driver::ContactEngine;
