//! Benchmarks for low-level DSP primitives.

mod filter;
mod noise;

pub use filter::bench_filter;
pub use noise::bench_noise;
