use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Resonant State-Variable Filter
==============================

A Chamberlin-style two-integrator loop. One update yields low-pass, band-pass
and high-pass outputs at the same time, which is why the same primitive serves
as the tone shaper for impact/friction noise (band-pass tap) and as the
low-cut/high-cut stage of the offline conditioner (high-pass and low-pass taps).

    x ──(×bw)──►(+)──► hpf ──(×c)──► ∫ ──► bpf ──(×c)──► ∫ ──► lpf
                 ▲ ▲                        │                   │
                 │ └──────(×−bw)────────────┘                   │
                 └────────────(×−1)─────────────────────────────┘

Update (run twice per sample):

    lpf += c * bpf
    hpf  = bw*x - lpf - bpf*bw
    bpf += c * hpf

Running the loop twice per input sample is 2× oversampling of the integrators,
which is why the coefficient uses half the normalized frequency:

    c = 2 * sin(π * clamp(freq / sample_rate, 0, 0.5) / 2)

With the clamp, c never exceeds 2·sin(π/4) ≈ 1.414.

Stability
---------

For one update the state matrix has det = 1 − c·bw and
trace = 2 − c² − c·bw. The loop is stable when

    0 < c·bw < 2    and    c² + 2·c·bw < 4

Every coefficient this crate produces (c ≤ 1.414) is stable for bw up to
about 0.7, and for bw = 1 up to roughly 0.42 × sample_rate.

Note on gain: the input is pre-scaled by bw, so the low-pass tap settles at
bw·x for DC input. The conditioner normalizes afterwards, the generators fold
it into their normalization factor.
*/

/// Largest bandwidth that stays inside the stable region at every cutoff.
///
/// At c = 2·sin(π/4) the second condition needs bw < 1/√2.
pub const MAX_STABLE_BANDWIDTH: f32 = 0.7;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTap {
    LowPass,
    BandPass,
    HighPass,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

impl FilterOutputs {
    #[inline]
    pub fn tap(&self, tap: FilterTap) -> f32 {
        match tap {
            FilterTap::LowPass => self.lowpass,
            FilterTap::BandPass => self.bandpass,
            FilterTap::HighPass => self.highpass,
        }
    }
}

/// Map a cutoff in Hz to the loop coefficient.
///
/// Frequencies outside `[0, sample_rate / 2]` are clamped before `sin` is
/// evaluated. A non-positive or non-finite sample rate gives 0 (the filter
/// holds its state).
#[inline]
pub fn cutoff_coefficient(freq_hz: f32, sample_rate: f32) -> f32 {
    if !(sample_rate > 0.0) || !sample_rate.is_finite() {
        return 0.0;
    }
    let normalized = (freq_hz / sample_rate).clamp(0.0, 0.5);
    if normalized.is_nan() {
        return 0.0;
    }
    2.0 * (PI * normalized * 0.5).sin()
}

/// Two-state resonant filter. One instance per channel per stage.
#[derive(Debug, Clone, Default)]
pub struct ResonantSvf {
    lpf: f32,
    bpf: f32,
}

impl ResonantSvf {
    pub fn new() -> Self {
        Self { lpf: 0.0, bpf: 0.0 }
    }

    /// Advance one sample with a precomputed coefficient and bandwidth.
    #[inline]
    pub fn process(&mut self, x: f32, cutoff: f32, bandwidth: f32) -> FilterOutputs {
        let drive = bandwidth * x;

        self.lpf += cutoff * self.bpf;
        let hpf = drive - self.lpf - self.bpf * bandwidth;
        self.bpf += cutoff * hpf;

        self.lpf += cutoff * self.bpf;
        let hpf = drive - self.lpf - self.bpf * bandwidth;
        self.bpf += cutoff * hpf;

        FilterOutputs {
            lowpass: self.lpf,
            bandpass: self.bpf,
            highpass: hpf,
        }
    }

    #[inline]
    pub fn bandpass(&mut self, x: f32, cutoff: f32, bandwidth: f32) -> f32 {
        self.process(x, cutoff, bandwidth).bandpass
    }

    /// Filter a strided run of samples in place, keeping one tap.
    ///
    /// `stride` is the channel count when walking one channel of an
    /// interleaved buffer starting at `offset`.
    pub fn render_strided(
        &mut self,
        buffer: &mut [f32],
        offset: usize,
        stride: usize,
        cutoff: f32,
        bandwidth: f32,
        tap: FilterTap,
    ) {
        for sample in buffer.iter_mut().skip(offset).step_by(stride.max(1)) {
            *sample = self.process(*sample, cutoff, bandwidth).tap(tap);
        }
    }

    pub fn reset(&mut self) {
        self.lpf = 0.0;
        self.bpf = 0.0;
    }

    pub fn state(&self) -> (f32, f32) {
        (self.lpf, self.bpf)
    }
}
