//! Benchmarks for the LCG noise source.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use contact_noise::dsp::NoiseSource;

use crate::BLOCK_SIZES;

pub fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/noise");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut rng = NoiseSource::new(42);

        group.bench_with_input(BenchmarkId::new("bipolar", size), &size, |b, _| {
            b.iter(|| {
                for s in buffer.iter_mut() {
                    *s = rng.next_bipolar();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
