//! Offline conditioning for samples before they are handed to the engine.
//!
//! Raw recordings tend to carry rumble below the useful band and hiss above
//! it. The conditioner runs a cascade of the crate's state-variable filter
//! over each channel (low-cut passes, then high-cut passes, each with a fresh
//! filter) and peak-normalizes every channel it changed. This runs once per
//! sample at load time, off the audio thread, and may allocate freely.
//!
//! ```
//! use contact_noise::conditioner::{condition, ConditionParams, SampleBuffer};
//!
//! let data: Vec<f32> = (0..4_800).map(|n| (n as f32 * 0.05).sin() * 0.25).collect();
//! let mut sample = SampleBuffer::new(data, 1, 48_000, "tick").unwrap();
//! let params = ConditionParams { lowcut_hz: 40.0, highcut_hz: 12_000.0, order: 2 };
//!
//! let report = condition(&mut sample, &params);
//! assert!(report.modified);
//! let peak = sample.samples().iter().fold(0.0f32, |p, s| p.max(s.abs()));
//! assert!((peak - 1.0).abs() < 1e-6);
//! ```

mod sample;
/// Hand-off of conditioned samples to an external consumer.
pub mod upload;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{cutoff_coefficient, FilterTap, ResonantSvf};

pub use sample::SampleBuffer;
pub use upload::{SampleSink, SampleUploader};

/// Damping used by every conditioning stage (Butterworth-like).
pub const CONDITION_BANDWIDTH: f32 = 0.707;

/// Peaks at or below this are treated as silence and left unscaled.
pub const SILENCE_EPSILON: f32 = 1.0e-12;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionParams {
    /// Low-cut corner in Hz. `<= 0` disables the low-cut stages.
    pub lowcut_hz: f32,
    /// High-cut corner in Hz. At or above Nyquist disables the high-cut stages.
    pub highcut_hz: f32,
    /// Passes per stage.
    pub order: usize,
}

impl Default for ConditionParams {
    fn default() -> Self {
        Self {
            lowcut_hz: 0.0,
            highcut_hz: 24_000.0,
            order: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionReport {
    /// Whether any filter pass ran.
    pub modified: bool,
    pub lowcut_passes: usize,
    pub highcut_passes: usize,
    /// Gain applied per channel by normalization. `None` for skipped
    /// (silent) channels; empty when nothing was modified.
    pub channel_gains: Vec<Option<f32>>,
}

/// Filter and normalize `sample` in place.
pub fn condition(sample: &mut SampleBuffer, params: &ConditionParams) -> ConditionReport {
    let sample_rate = sample.sample_rate() as f32;
    let channels = sample.channels();

    let lowcut = params.lowcut_hz > 0.0;
    let highcut = params.highcut_hz < sample_rate * 0.5;
    let lowcut_coef = cutoff_coefficient(params.lowcut_hz, sample_rate);
    let highcut_coef = cutoff_coefficient(params.highcut_hz, sample_rate);

    let mut report = ConditionReport {
        lowcut_passes: if lowcut { params.order } else { 0 },
        highcut_passes: if highcut { params.order } else { 0 },
        ..ConditionReport::default()
    };
    report.modified = report.lowcut_passes + report.highcut_passes > 0;

    let data = sample.samples_mut();
    for ch in 0..channels {
        for _ in 0..report.lowcut_passes {
            ResonantSvf::new().render_strided(
                data,
                ch,
                channels,
                lowcut_coef,
                CONDITION_BANDWIDTH,
                FilterTap::HighPass,
            );
        }
        for _ in 0..report.highcut_passes {
            ResonantSvf::new().render_strided(
                data,
                ch,
                channels,
                highcut_coef,
                CONDITION_BANDWIDTH,
                FilterTap::LowPass,
            );
        }
        if report.modified {
            report
                .channel_gains
                .push(normalize_strided(data, ch, channels));
        }
    }

    let silent = report.channel_gains.iter().filter(|g| g.is_none()).count();
    if silent > 0 {
        tracing::warn!(
            name = sample.name(),
            silent_channels = silent,
            "silent channel left unnormalized"
        );
    }
    tracing::debug!(
        name = sample.name(),
        frames = sample.frames(),
        channels,
        lowcut_passes = report.lowcut_passes,
        highcut_passes = report.highcut_passes,
        "conditioned sample"
    );

    report
}

/// Scale `samples` so the largest magnitude becomes exactly 1.0.
///
/// Returns the applied gain, or `None` for (near-)silent input, which is left
/// untouched. Running it twice changes nothing.
pub fn normalize_peak(samples: &mut [f32]) -> Option<f32> {
    normalize_strided(samples, 0, 1)
}

fn normalize_strided(data: &mut [f32], offset: usize, stride: usize) -> Option<f32> {
    let peak = data
        .iter()
        .skip(offset)
        .step_by(stride)
        .fold(0.0f32, |peak, s| peak.max(s.abs()));
    if !(peak > SILENCE_EPSILON) {
        return None;
    }
    for s in data.iter_mut().skip(offset).step_by(stride) {
        *s /= peak;
    }
    Some(1.0 / peak)
}
