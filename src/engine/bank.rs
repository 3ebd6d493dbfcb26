use rtrb::Consumer;

use crate::{
    config::{BankConfig, MAX_IMPACTS},
    contact::burst::ImpactEvent,
    dsp::{NoiseSource, ResonantSvf},
};

/*
Impact Burst Bank
=================

The single impact envelope re-triggers on the loudest hit and ignores the
rest, which suits one rigid object. A pile of gravel needs every collision to
ring independently, so the bank keeps a pool of bursts:

  physics ──ImpactTrigger──► rtrb queue ──► ImpactBank::render
                                             │
                         ┌───────────────────┴──────────┐
                         │ burst 0  burst 1 ... burst N │  (N ≤ max_impacts)
                         └──────────────────────────────┘

Per render call the queue is drained into the pool (new bursts past the limit
are dropped), each burst renders the whole buffer, and bursts whose volume
has fallen below the threshold are swap-removed. The pool is allocated for
MAX_IMPACTS up front, so admitting a burst never allocates.

Per burst, per sample:

    volume *= decay
    y = bandpass(noise in [-1, 1)) · volume · gain
*/

struct Burst {
    event: ImpactEvent,
    filter: ResonantSvf,
}

impl Burst {
    fn new(event: ImpactEvent) -> Self {
        Self {
            event,
            filter: ResonantSvf::new(),
        }
    }

    #[inline]
    fn next_sample(&mut self, rng: &mut NoiseSource) -> f32 {
        self.event.volume *= self.event.decay;
        self.filter
            .bandpass(rng.next_signed(), self.event.cutoff, self.event.bandwidth)
            * self.event.volume
    }
}

#[inline]
fn db_to_gain(db: f32) -> f32 {
    10.0f32.powf(db * 0.05)
}

pub struct ImpactBank {
    rx: Consumer<ImpactEvent>,
    bursts: Vec<Burst>,
    rng: NoiseSource,
    max_impacts: usize,
    gain: f32,
    threshold: f32,
    dropped: u64,
}

impl ImpactBank {
    pub fn new(config: &BankConfig, rx: Consumer<ImpactEvent>, rng: NoiseSource) -> Self {
        let max_impacts = config.max_impacts.clamp(1, MAX_IMPACTS);
        Self {
            rx,
            bursts: Vec::with_capacity(MAX_IMPACTS),
            rng,
            max_impacts,
            gain: db_to_gain(config.gain_db),
            threshold: db_to_gain(config.threshold_db),
            dropped: 0,
        }
    }

    pub fn set_gain_db(&mut self, db: f32) {
        self.gain = db_to_gain(db);
    }

    pub fn set_threshold_db(&mut self, db: f32) {
        self.threshold = db_to_gain(db);
    }

    /// Limit for newly admitted bursts. Bursts already ringing finish.
    pub fn set_max_impacts(&mut self, max_impacts: usize) {
        self.max_impacts = max_impacts.clamp(1, MAX_IMPACTS);
    }

    /// Add all ringing bursts to `data` (interleaved, `channels` wide).
    pub fn render(&mut self, data: &mut [f32], channels: usize) {
        while let Ok(event) = self.rx.pop() {
            if self.bursts.len() < self.max_impacts {
                self.bursts.push(Burst::new(event));
            } else {
                self.dropped += 1;
            }
        }

        if channels == 0 {
            return;
        }

        let mut i = 0;
        while i < self.bursts.len() {
            let burst = &mut self.bursts[i];
            for frame in data.chunks_exact_mut(channels) {
                let sample = burst.next_sample(&mut self.rng) * self.gain;
                for out in frame.iter_mut() {
                    *out += sample;
                }
            }
            if burst.event.volume < self.threshold {
                self.bursts.swap_remove(i);
            } else {
                i += 1;
            }
        }
    }

    /// Bursts currently ringing.
    pub fn active(&self) -> usize {
        self.bursts.len()
    }

    /// Bursts refused because the pool was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
