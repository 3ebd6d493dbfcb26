//! Benchmarks for the double-sampled state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use contact_noise::dsp::{cutoff_coefficient, FilterTap, NoiseSource, ResonantSvf};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let coef = cutoff_coefficient(1_000.0, 48_000.0);

    for &size in BLOCK_SIZES {
        // White noise input
        let mut rng = NoiseSource::new(7);
        let input: Vec<f32> = (0..size).map(|_| rng.next_bipolar()).collect();

        // Per-sample process, bandpass tap (what the envelopes use)
        let mut filter = ResonantSvf::new();
        group.bench_with_input(BenchmarkId::new("bandpass", size), &size, |b, _| {
            b.iter(|| {
                let mut acc = 0.0;
                for &x in input.iter() {
                    acc += filter.process(black_box(x), coef, 0.3).bandpass;
                }
                black_box(acc)
            })
        });

        // Interleaved stereo buffer, one channel (what the conditioner uses)
        let stereo: Vec<f32> = input.iter().flat_map(|&x| [x, x]).collect();
        let mut buffer = stereo.clone();
        let mut filter = ResonantSvf::new();
        group.bench_with_input(BenchmarkId::new("strided_lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&stereo);
                filter.render_strided(
                    black_box(&mut buffer),
                    0,
                    2,
                    coef,
                    0.707,
                    FilterTap::LowPass,
                );
            })
        });
    }

    group.finish();
}
