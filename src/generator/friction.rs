use crate::{
    config::FrictionConfig,
    dsp::{
        cutoff_coefficient,
        decay::{self, bandwidth_norm, decay_constant},
        NoiseSource, ResonantSvf,
    },
};

/*
Friction Envelope
=================

Sliding and rolling are heard as a dense stream of tiny grains: micro-impacts
between surface asperities. The faster the motion, the more grains per second
and the brighter they get.

Speed
-----

The physics side publishes a speed once per tick. Inside one render block the
speed ramps linearly from the previous block's value to the new one, and the
ramp (and everything derived from it) is re-evaluated every 16 frames:

    speed(n) = last + (target - last) · n / frames     n = 0, 16, 32, ...
    cutoff   = coefficient(lerp(freq_min, freq_max, speed))

Grains
------

A countdown is decremented by the current speed every sample. When it drops
to zero or below it is refilled with a random period and a new grain starts:

    counter -= speed
    while counter <= 0:
        counter += rand(period_min, period_max) · sample_rate     (≥ 1 sample)
        grain    = rand(0, 1) · friction_amp

At speed 1.0 a grain starts every period seconds; at speed 0 the countdown
freezes. Each refill is at least one sample, so the loop always terminates.

Excitation
----------

    level = white_noise + grain + sustain
    y     = bandpass(noise · level · norm · speed)

`sustain` is a floor raised while the body reports continuing contact, so a
box resting on a slowly tilting plank keeps whispering between grains. It
either holds until overwritten or decays with its own time constant.
*/

/// Frames between re-evaluations of the speed ramp and cutoff.
pub const PARAM_UPDATE_INTERVAL: usize = 16;

/// Smallest grain spacing, in samples.
const MIN_PERIOD_SAMPLES: f32 = 1.0;

pub struct FrictionEnvelope {
    config: FrictionConfig,
    sample_rate: f32,

    // Per-block ramp
    last_speed: f32,
    target_speed: f32,
    block_frames: usize,
    speed: f32,

    // Grain state
    counter: f32,
    grain: f32,
    grain_decay: f32,
    sustain: f32,
    sustain_decay: f32,

    cutoff: f32,
    norm: f32,
    filter: ResonantSvf,
}

impl FrictionEnvelope {
    pub fn new(config: FrictionConfig, sample_rate: f32) -> Self {
        let norm = bandwidth_norm(config.bandwidth);
        let mut env = Self {
            config,
            sample_rate,
            last_speed: 0.0,
            target_speed: 0.0,
            block_frames: 1,
            speed: 0.0,
            counter: 0.0,
            grain: 0.0,
            grain_decay: 0.0,
            sustain: 0.0,
            sustain_decay: 1.0,
            cutoff: 0.0,
            norm,
            filter: ResonantSvf::new(),
        };
        env.set_sample_rate(sample_rate);
        env
    }

    /// Recompute the decay constants for a new rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.grain_decay = decay_constant(self.config.decay_time, sample_rate);
        self.sustain_decay = match self.config.stay_decay_time {
            Some(time) => decay_constant(time, sample_rate),
            None => 1.0,
        };
        self.update_params(0);
    }

    /// Start a block of `frames` frames ramping towards `target_speed`.
    pub fn begin_block(&mut self, target_speed: f32, frames: usize) {
        self.target_speed = target_speed.max(0.0);
        self.block_frames = frames.max(1);
    }

    /// Store the block's target as the next block's starting point.
    pub fn end_block(&mut self) {
        self.last_speed = self.target_speed;
    }

    /// Raise the contact floor to the configured level.
    pub fn sustain_contact(&mut self) {
        self.sustain = self.config.stay_amplitude;
    }

    /// Re-evaluate the ramp and cutoff if `frame` is on the update grid.
    #[inline]
    pub fn update_params(&mut self, frame: usize) {
        if frame % PARAM_UPDATE_INTERVAL != 0 {
            return;
        }
        let t = frame as f32 / self.block_frames as f32;
        self.speed = self.last_speed + (self.target_speed - self.last_speed) * t;
        self.cutoff = cutoff_coefficient(self.config.frequency.lerp(self.speed), self.sample_rate);
        self.norm = bandwidth_norm(self.config.bandwidth);
    }

    /// Run the grain countdown for one sample, drawing new grains as needed.
    ///
    /// Returns the number of grains started (normally 0 or 1).
    #[inline]
    pub fn advance(&mut self, rng: &mut NoiseSource) -> u32 {
        let period = &self.config.period;
        let mut started = 0;
        self.counter -= self.speed;
        while self.counter <= 0.0 {
            let span = rng.next_range(period.min, period.max) * self.sample_rate;
            self.counter += span.max(MIN_PERIOD_SAMPLES);
            self.grain = rng.next() * self.config.amplitude;
            started += 1;
        }
        started
    }

    /// Render one sample from the shared excitation `noise`.
    #[inline]
    pub fn next_sample(&mut self, noise: f32) -> f32 {
        self.grain = decay::step(self.grain, self.grain_decay);
        let level = self.config.white_noise + self.grain + self.sustain;
        let out = self.filter.bandpass(
            noise * level * self.norm * self.speed,
            self.cutoff,
            self.config.bandwidth,
        );
        self.sustain *= self.sustain_decay;
        if self.sustain < decay::DENORMAL_FLOOR {
            self.sustain = 0.0;
        }
        out
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn counter(&self) -> f32 {
        self.counter
    }

    pub fn grain(&self) -> f32 {
        self.grain
    }

    pub fn sustain(&self) -> f32 {
        self.sustain
    }

    pub fn reset(&mut self) {
        self.last_speed = 0.0;
        self.target_speed = 0.0;
        self.speed = 0.0;
        self.counter = 0.0;
        self.grain = 0.0;
        self.sustain = 0.0;
        self.filter.reset();
        self.update_params(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParamRange;

    #[test]
    fn test_retrigger_every_period() {
        // 1 s at 100 Hz = exactly 100 samples per grain at unit speed.
        let config = FrictionConfig {
            period: ParamRange::fixed(1.0),
            ..FrictionConfig::default()
        };
        let mut env = FrictionEnvelope::new(config, 100.0);
        let mut rng = NoiseSource::new(5);

        // Settle the ramp so every block starts and ends at unit speed.
        env.begin_block(1.0, 64);
        env.end_block();

        let mut fired = Vec::new();
        for n in 0..1_000 {
            env.begin_block(1.0, 64);
            env.update_params(0);
            assert_eq!(env.speed(), 1.0);
            if env.advance(&mut rng) > 0 {
                fired.push(n);
            }
            env.next_sample(rng.next_bipolar());
            env.end_block();
        }

        // The empty counter fires on the first sample, then every 100 samples.
        assert_eq!(fired[0], 0);
        assert!(fired.len() >= 10);
        for pair in fired[1..].windows(2) {
            assert_eq!(pair[1] - pair[0], 100, "drift in {:?}", fired);
        }
    }

    #[test]
    fn test_speed_ramps_across_block() {
        let mut env = FrictionEnvelope::new(FrictionConfig::default(), 48_000.0);
        env.begin_block(1.0, 64);
        env.update_params(0);
        assert_eq!(env.speed(), 0.0);
        env.update_params(16);
        assert_eq!(env.speed(), 0.25);
        env.update_params(17);
        assert_eq!(env.speed(), 0.25);
        env.update_params(48);
        assert_eq!(env.speed(), 0.75);
        env.end_block();

        env.begin_block(1.0, 64);
        env.update_params(0);
        assert_eq!(env.speed(), 1.0);
    }

    #[test]
    fn test_zero_speed_is_silent_and_frozen() {
        let mut env = FrictionEnvelope::new(FrictionConfig::default(), 48_000.0);
        let mut rng = NoiseSource::new(9);
        // First advance at zero speed still fills the empty counter once.
        env.begin_block(0.0, 128);
        env.update_params(0);
        env.advance(&mut rng);
        let counter = env.counter();

        for n in 1..128 {
            env.update_params(n);
            assert_eq!(env.advance(&mut rng), 0);
            let y = env.next_sample(rng.next_bipolar());
            assert_eq!(y, 0.0);
        }
        assert_eq!(env.counter(), counter);
    }

    #[test]
    fn test_grain_decays_between_triggers() {
        let config = FrictionConfig {
            period: ParamRange::fixed(10.0),
            amplitude: 1.0,
            decay_time: 0.01,
            ..FrictionConfig::default()
        };
        let mut env = FrictionEnvelope::new(config, 48_000.0);
        let mut rng = NoiseSource::new(21);
        env.begin_block(0.0, 1);
        env.update_params(0);
        env.advance(&mut rng);

        let mut prev = env.grain();
        for _ in 0..4_800 {
            env.next_sample(0.1);
            assert!(env.grain() <= prev);
            prev = env.grain();
        }
        assert!(prev < 1.0e-4);
    }

    #[test]
    fn test_sticky_sustain_floor() {
        let mut env = FrictionEnvelope::new(FrictionConfig::default(), 48_000.0);
        env.sustain_contact();
        for _ in 0..10_000 {
            env.next_sample(0.0);
        }
        assert_eq!(env.sustain(), 0.05);
    }

    #[test]
    fn test_sustain_floor_with_decay() {
        let config = FrictionConfig {
            stay_decay_time: Some(0.1),
            ..FrictionConfig::default()
        };
        let mut env = FrictionEnvelope::new(config, 48_000.0);
        env.sustain_contact();
        for _ in 0..4_800 {
            env.next_sample(0.0);
        }
        let expected = 0.05 * (-1.0f32).exp();
        assert!((env.sustain() - expected).abs() < 1e-3 * expected.max(1.0));
    }

    #[test]
    fn test_decaying_sustain_flushes_to_zero() {
        let config = FrictionConfig {
            stay_decay_time: Some(0.001),
            ..FrictionConfig::default()
        };
        let mut env = FrictionEnvelope::new(config, 48_000.0);
        env.sustain_contact();
        // About 18 time constants take 0.05 below the floor (under 1000 samples).
        for _ in 0..96_000 {
            env.next_sample(0.0);
            let s = env.sustain();
            assert!(s == 0.0 || s.is_normal(), "subnormal sustain {s:e}");
        }
        assert_eq!(env.sustain(), 0.0);
    }

    #[test]
    fn test_moving_body_makes_noise() {
        let mut env = FrictionEnvelope::new(FrictionConfig::default(), 48_000.0);
        let mut rng = NoiseSource::new(2);
        let mut energy = 0.0;
        env.begin_block(1.0, 512);
        env.end_block();
        env.begin_block(1.0, 512);
        for n in 0..512 {
            env.update_params(n);
            env.advance(&mut rng);
            let y = env.next_sample(rng.next_bipolar());
            assert!(y.is_finite());
            energy += y * y;
        }
        assert!(energy > 0.0);
    }
}
