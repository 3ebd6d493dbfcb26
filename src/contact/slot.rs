use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/*
Lock-free Handoff Slots
=======================

The physics loop and the audio callback run on unrelated threads. Neither may
wait for the other: the audio side has a hard deadline and a lock there risks
priority inversion. So the two sides share single-value slots, each a whole
machine word updated atomically.

  SharedScalar   last write wins       (speed)
  PeakSlot       largest pending wins  (impact magnitude), consumed by swap
  FlagSlot       set by producer       (continuing contact), consumed by swap

f32 values travel as their bit pattern inside an AtomicU32. All accesses are
Relaxed: each slot is independent, nothing else is published through them,
and a reader one buffer behind the writer is acceptable for audio.

Staleness: the audio side reads each slot once per render call, so a value
written just after that read is heard one buffer period later.
*/

/// An f32 shared between threads, last write wins.
#[derive(Debug, Default)]
pub struct SharedScalar {
    bits: AtomicU32,
}

impl SharedScalar {
    pub fn new(value: f32) -> Self {
        Self {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    #[inline]
    pub fn store(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// Holds the largest value offered since the last [`PeakSlot::take`].
#[derive(Debug, Default)]
pub struct PeakSlot {
    bits: AtomicU32,
}

impl PeakSlot {
    pub fn new() -> Self {
        Self {
            bits: AtomicU32::new(0.0f32.to_bits()),
        }
    }

    /// Offer a non-negative value. Zero, negative and NaN values are ignored.
    #[inline]
    pub fn offer(&self, value: f32) {
        if !(value > 0.0) {
            return;
        }
        // Non-negative floats order the same as their bit patterns.
        self.bits.fetch_max(value.to_bits(), Ordering::Relaxed);
    }

    /// Consume the pending value, leaving the slot empty (0.0).
    #[inline]
    pub fn take(&self) -> f32 {
        f32::from_bits(self.bits.swap(0.0f32.to_bits(), Ordering::Relaxed))
    }

    #[inline]
    pub fn peek(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// A boolean event latched until the consumer takes it.
#[derive(Debug, Default)]
pub struct FlagSlot {
    flag: AtomicBool,
}

impl FlagSlot {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn raise(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::Relaxed)
    }
}
