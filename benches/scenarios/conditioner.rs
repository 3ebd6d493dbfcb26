//! Benchmarks for load-time sample conditioning.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use contact_noise::{
    conditioner::{condition, ConditionParams, SampleBuffer},
    dsp::NoiseSource,
};

pub fn bench_conditioner(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/conditioner");
    let params = ConditionParams {
        lowcut_hz: 40.0,
        highcut_hz: 12_000.0,
        order: 3,
    };

    // One second of stereo noise at 48kHz
    let mut rng = NoiseSource::new(9);
    let data: Vec<f32> = (0..96_000).map(|_| rng.next_bipolar()).collect();
    let Ok(source) = SampleBuffer::new(data, 2, 48_000, "noise") else {
        return;
    };

    group.bench_with_input(BenchmarkId::new("stereo_1s", 48_000), &params, |b, params| {
        b.iter(|| {
            let mut sample = source.clone();
            black_box(condition(black_box(&mut sample), params));
        })
    });

    group.finish();
}
