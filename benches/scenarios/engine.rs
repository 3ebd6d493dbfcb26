//! Benchmarks for the render-callback entry points.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use contact_noise::{
    contact::{self, burst},
    dsp::NoiseSource,
    engine::{ContactEngine, ImpactBank},
    ContactNoiseConfig,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: f32 = 48_000.0;
const CHANNELS: usize = 2;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");
    let config = ContactNoiseConfig::default();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * CHANNELS];

        // === SLIDING ===
        // Constant contact, friction grains retriggering every few ms
        let (tx, rx) = contact::channel();
        let Ok(mut engine) = ContactEngine::new(&config, rx, NoiseSource::new(1)) else {
            return;
        };
        engine.set_sample_rate(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("sliding", size), &size, |b, _| {
            b.iter(|| {
                tx.set_speed(2.0);
                tx.report_contact();
                buffer.fill(0.0);
                engine.render(black_box(&mut buffer), CHANNELS);
            })
        });

        // === RATTLING ===
        // An impact every block on top of the sliding load
        let (tx, rx) = contact::channel();
        let Ok(mut engine) = ContactEngine::new(&config, rx, NoiseSource::new(2)) else {
            return;
        };
        engine.set_sample_rate(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("rattling", size), &size, |b, _| {
            b.iter(|| {
                tx.report_impact(10.0);
                tx.set_speed(1.0);
                tx.report_contact();
                buffer.fill(0.0);
                engine.render(black_box(&mut buffer), CHANNELS);
            })
        });
    }

    group.finish();
}

pub fn bench_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/bank");
    let config = ContactNoiseConfig::default();

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size * CHANNELS];

        // === GRAVEL ===
        // A handful of pebbles per block, pool mostly full
        let (mut trigger, events) = burst::channel(&config.burst, SAMPLE_RATE, NoiseSource::new(3));
        let mut bank = ImpactBank::new(&config.bank, events, NoiseSource::new(4));
        let mut scatter = NoiseSource::new(5);
        group.bench_with_input(BenchmarkId::new("gravel", size), &size, |b, _| {
            b.iter(|| {
                for _ in 0..8 {
                    trigger.collide(0.05, scatter.next_range(0.5, 3.0), scatter.next_range(0.0, 3.0));
                }
                buffer.fill(0.0);
                bank.render(black_box(&mut buffer), CHANNELS);
            })
        });
    }

    group.finish();
}
