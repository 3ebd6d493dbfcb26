//! Real-world scenario benchmarks.
//!
//! These model the demo host: a contact engine fed by a physics thread, an
//! impact bank under a steady stream of gravel, and load-time conditioning.

mod conditioner;
mod engine;

pub use conditioner::bench_conditioner;
pub use engine::{bench_bank, bench_engine};
