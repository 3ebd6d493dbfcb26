use crate::{
    config::ContactNoiseConfig,
    contact::ContactReceiver,
    dsp::NoiseSource,
    error::ConfigError,
    generator::{FrictionEnvelope, ImpactEnvelope},
};

/*
Render Callback Driver
======================

Called by the host once per audio buffer. Everything it touches is owned by
the engine and allocated before the first call; the body below only does
arithmetic on fields.

Per call:

  1. Bail out (buffer untouched) until the sample rate is known.
  2. Take one ContactSnapshot. Reading the slots once per buffer, not per
     sample, means the whole buffer sees one consistent impact/speed pair.
  3. For every frame:
       friction countdown (may draw grain parameters)
       noise = rng in [-0.5, 0.5)
       y     = impact(noise) + friction(noise)
       frame[ch] += y   for every channel
  4. Keep the block's speed as the next block's ramp start.

The random draws happen in a fixed order, so a given seed and the same
sequence of snapshots reproduce the output bit for bit.
*/

pub struct ContactEngine {
    rx: ContactReceiver,
    rng: NoiseSource,
    impact: ImpactEnvelope,
    friction: FrictionEnvelope,
    sample_rate: Option<f32>,
}

impl ContactEngine {
    /// Build an engine reading from `rx`. Silent until [`set_sample_rate`].
    ///
    /// [`set_sample_rate`]: ContactEngine::set_sample_rate
    pub fn new(
        config: &ContactNoiseConfig,
        rx: ContactReceiver,
        rng: NoiseSource,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::debug!(seed = rng.seed(), "contact engine created");

        Ok(Self {
            rx,
            rng,
            impact: ImpactEnvelope::new(config.impact.clone(), 0.0),
            friction: FrictionEnvelope::new(config.friction.clone(), 0.0),
            sample_rate: None,
        })
    }

    /// Set the host rate. Non-positive or non-finite rates disable rendering.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if !(sample_rate > 0.0) || !sample_rate.is_finite() {
            tracing::warn!(sample_rate, "rejecting sample rate, engine stays silent");
            self.sample_rate = None;
            return;
        }
        self.impact.set_sample_rate(sample_rate);
        self.friction.set_sample_rate(sample_rate);
        self.sample_rate = Some(sample_rate);
        tracing::info!(sample_rate, "contact engine ready");
    }

    pub fn sample_rate(&self) -> Option<f32> {
        self.sample_rate
    }

    /// Add one buffer of contact noise to `data` (interleaved, `channels` wide).
    ///
    /// Realtime-safe: no allocation, locking or logging. Existing content is
    /// kept and added to. A trailing partial frame is left alone.
    pub fn render(&mut self, data: &mut [f32], channels: usize) {
        if self.sample_rate.is_none() || channels == 0 {
            return;
        }
        let frames = data.len() / channels;
        if frames == 0 {
            return;
        }

        let snapshot = self.rx.snapshot();
        self.impact.trigger(snapshot.impact, &mut self.rng);
        if snapshot.touching {
            self.friction.sustain_contact();
        }
        self.friction.begin_block(snapshot.speed, frames);

        for (n, frame) in data.chunks_exact_mut(channels).enumerate() {
            self.friction.update_params(n);
            self.friction.advance(&mut self.rng);

            let noise = self.rng.next_bipolar();
            let sample = self.impact.next_sample(noise) + self.friction.next_sample(noise);

            for out in frame.iter_mut() {
                *out += sample;
            }
        }

        self.friction.end_block();
    }

    pub fn impact(&self) -> &ImpactEnvelope {
        &self.impact
    }

    pub fn friction(&self) -> &FrictionEnvelope {
        &self.friction
    }

    /// Silence both generators. The next render starts from rest.
    pub fn reset(&mut self) {
        self.impact.reset();
        self.friction.reset();
    }
}
