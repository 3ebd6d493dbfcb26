use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    config::{BurstConfig, ParamRange},
    dsp::{cutoff_coefficient, decay::decay_constant, NoiseSource, MAX_STABLE_BANDWIDTH},
};

/// One fully parameterized burst, ready for the bank to play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactEvent {
    pub volume: f32,
    /// Per-sample volume multiplier.
    pub decay: f32,
    /// Filter coefficient (see [`cutoff_coefficient`]).
    pub cutoff: f32,
    pub bandwidth: f32,
}

/// Physics-side producer of [`ImpactEvent`]s.
///
/// Each collision draws its own cutoff, bandwidth and decay, so a pile of
/// debris never sounds like one sample repeated.
pub struct ImpactTrigger {
    tx: Producer<ImpactEvent>,
    rng: NoiseSource,
    cutoff: ParamRange,
    bandwidth: ParamRange,
    decay_time: ParamRange,
    sample_rate: f32,
    dropped: u64,
}

impl ImpactTrigger {
    /// Queue a burst for a collision `distance` units away from the listener.
    ///
    /// Returns `false` when the queue is full and the burst was dropped.
    pub fn collide(&mut self, mass: f32, relative_speed: f32, distance: f32) -> bool {
        let energy = mass * relative_speed * relative_speed;
        let cutoff = cutoff_coefficient(
            self.rng.next_range(self.cutoff.min, self.cutoff.max),
            self.sample_rate,
        );
        let bandwidth = self
            .rng
            .next_range(self.bandwidth.min, self.bandwidth.max)
            .clamp(0.0, MAX_STABLE_BANDWIDTH);
        let gain = 0.5 * (1.0 - bandwidth * bandwidth);
        let decay = decay_constant(
            self.rng.next_range(self.decay_time.min, self.decay_time.max),
            self.sample_rate,
        );

        let event = ImpactEvent {
            volume: gain * energy / (1.0 + 5.0 * distance.max(0.0)),
            decay,
            cutoff,
            bandwidth,
        };

        match self.tx.push(event) {
            Ok(()) => true,
            Err(_) => {
                self.dropped += 1;
                tracing::trace!(dropped = self.dropped, "burst queue full");
                false
            }
        }
    }

    /// Bursts lost to a full queue so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Create the trigger and the consumer end the [`ImpactBank`] drains.
///
/// [`ImpactBank`]: crate::engine::bank::ImpactBank
pub fn channel(
    config: &BurstConfig,
    sample_rate: f32,
    rng: NoiseSource,
) -> (ImpactTrigger, Consumer<ImpactEvent>) {
    let (tx, rx) = RingBuffer::new(config.queue_capacity.max(1));
    let trigger = ImpactTrigger {
        tx,
        rng,
        cutoff: config.cutoff,
        bandwidth: config.bandwidth,
        decay_time: config.decay_time,
        sample_rate,
        dropped: 0,
    };
    (trigger, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BurstConfig {
        BurstConfig {
            cutoff: ParamRange::fixed(1_000.0),
            bandwidth: ParamRange::fixed(0.2),
            decay_time: ParamRange::fixed(0.1),
            queue_capacity: 4,
        }
    }

    #[test]
    fn test_collision_parameters() {
        let (mut trigger, mut rx) = channel(&config(), 48_000.0, NoiseSource::new(1));
        assert!(trigger.collide(2.0, 3.0, 0.0));

        let event = rx.pop().expect("event queued");
        let gain = 0.5 * (1.0 - 0.2 * 0.2);
        assert!((event.volume - gain * 18.0).abs() < 1e-4);
        assert_eq!(event.cutoff, cutoff_coefficient(1_000.0, 48_000.0));
        assert_eq!(event.decay, decay_constant(0.1, 48_000.0));
        assert_eq!(event.bandwidth, 0.2);
    }

    #[test]
    fn test_distance_attenuates() {
        let (mut trigger, mut rx) = channel(&config(), 48_000.0, NoiseSource::new(1));
        trigger.collide(1.0, 1.0, 0.0);
        trigger.collide(1.0, 1.0, 1.0);
        let near = rx.pop().unwrap().volume;
        let far = rx.pop().unwrap().volume;
        assert!((near / far - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_bandwidth_clamped_to_stable_region() {
        let mut cfg = config();
        cfg.bandwidth = ParamRange::new(-0.5, -0.5);
        let (mut trigger, mut rx) = channel(&cfg, 48_000.0, NoiseSource::new(1));
        trigger.collide(1.0, 1.0, 0.0);
        assert_eq!(rx.pop().unwrap().bandwidth, 0.0);

        cfg.bandwidth = ParamRange::fixed(3.0);
        let (mut trigger, mut rx) = channel(&cfg, 48_000.0, NoiseSource::new(1));
        trigger.collide(1.0, 1.0, 0.0);
        assert_eq!(rx.pop().unwrap().bandwidth, MAX_STABLE_BANDWIDTH);
    }

    #[test]
    fn test_full_queue_drops() {
        let (mut trigger, _rx) = channel(&config(), 48_000.0, NoiseSource::new(1));
        for _ in 0..4 {
            assert!(trigger.collide(1.0, 1.0, 0.0));
        }
        assert!(!trigger.collide(1.0, 1.0, 0.0));
        assert_eq!(trigger.dropped(), 1);
    }
}
