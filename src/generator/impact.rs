use crate::{
    config::ImpactConfig,
    dsp::{
        cutoff_coefficient,
        decay::{self, bandwidth_norm, decay_constant},
        NoiseSource, ResonantSvf,
    },
};

/*
Impact Envelope
===============

A hit is a burst of band-passed noise whose level falls off exponentially.

  amplitude
    A ┐╲
      │ ╲
      │  ╲_
  A/e │    ╲__
      │       ╲___
    0 └───────────╲______→ samples
          decay_time·sr

Two conceptual states:

  Decaying      always running: amplitude *= decay (+ a 1e-9 floor)
  Re-triggered  entered when an impact stronger than the current amplitude
                arrives; fresh decay, cutoff, bandwidth and amplitude are
                drawn from the configured ranges

A weaker impact arriving while a louder one rings out is swallowed: it would
be masked anyway.

Per sample:

    y = bandpass(noise · amplitude · norm)
    amplitude = amplitude · decay + 1e-9

where norm = sqrt(|bw|·0.5 + 0.001) keeps perceived loudness roughly level
across bandwidth settings.
*/

pub struct ImpactEnvelope {
    config: ImpactConfig,
    sample_rate: f32,

    amplitude: f32,
    decay: f32,
    cutoff: f32,
    bandwidth: f32,
    norm: f32,
    filter: ResonantSvf,
}

impl ImpactEnvelope {
    pub fn new(config: ImpactConfig, sample_rate: f32) -> Self {
        Self {
            config,
            sample_rate,
            amplitude: 0.0,
            decay: 0.0,
            cutoff: 0.0,
            bandwidth: 0.0,
            norm: bandwidth_norm(0.0),
            filter: ResonantSvf::new(),
        }
    }

    /// Takes effect at the next re-trigger.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Re-trigger if `magnitude` exceeds the ringing amplitude.
    ///
    /// Returns `true` when new parameters were drawn.
    pub fn trigger(&mut self, magnitude: f32, rng: &mut NoiseSource) -> bool {
        if !(magnitude > self.amplitude) {
            return false;
        }
        let cfg = &self.config;

        let decay_time = rng.next_range(cfg.decay_time.min, cfg.decay_time.max);
        self.decay = decay_constant(decay_time, self.sample_rate);

        let freq = rng.next_range(cfg.frequency.min, cfg.frequency.max);
        self.cutoff = cutoff_coefficient(freq, self.sample_rate);

        self.bandwidth = rng.next_range(cfg.bandwidth.min, cfg.bandwidth.max);
        self.amplitude = rng.next_range(cfg.amplitude.min, cfg.amplitude.max);
        self.norm = bandwidth_norm(self.bandwidth);
        true
    }

    /// Render one sample from the shared excitation `noise`.
    #[inline]
    pub fn next_sample(&mut self, noise: f32) -> f32 {
        let out = self
            .filter
            .bandpass(noise * self.amplitude * self.norm, self.cutoff, self.bandwidth);
        self.amplitude = decay::step(self.amplitude, self.decay);
        out
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    pub fn reset(&mut self) {
        self.amplitude = 0.0;
        self.filter.reset();
    }
}
