//! Tuning surface for the generators, the burst bank and the demo.
//!
//! Everything here is a plain numeric range or scalar. Defaults follow the
//! behaviour the engine was tuned with; with the `serde` feature the whole
//! tree can be loaded from TOML, and any missing key falls back to its
//! default.

#[cfg(feature = "serde")]
use std::path::Path;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::MAX_STABLE_BANDWIDTH, error::ConfigError};

/// Hard capacity of the burst voice pool.
pub const MAX_IMPACTS: usize = 1000;

/// Closed range a random parameter is drawn from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Linear interpolation across the range, `t` unclamped.
    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + (self.max - self.min) * t
    }

    fn check(&self, name: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// One-shot impact envelope ranges. Every trigger draws fresh values.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactConfig {
    /// Seconds until the amplitude falls to 1/e.
    pub decay_time: ParamRange,
    /// Resonant cutoff in Hz.
    pub frequency: ParamRange,
    pub bandwidth: ParamRange,
    pub amplitude: ParamRange,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            decay_time: ParamRange::fixed(0.1),
            frequency: ParamRange::new(300.0, 900.0),
            bandwidth: ParamRange::fixed(0.3),
            amplitude: ParamRange::fixed(1.0),
        }
    }
}

/// Sustained friction texture.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct FrictionConfig {
    /// Seconds between grains at unit speed.
    pub period: ParamRange,
    /// Cutoff in Hz, interpolated by the current speed.
    pub frequency: ParamRange,
    /// Constant excitation under the grains.
    pub white_noise: f32,
    /// Upper bound of a grain's starting amplitude.
    pub amplitude: f32,
    pub decay_time: f32,
    pub bandwidth: f32,
    /// Floor applied while the body reports continuing contact.
    pub stay_amplitude: f32,
    /// Seconds for the contact floor to fall to 1/e. `None` keeps it until
    /// the next contact report overwrites it.
    pub stay_decay_time: Option<f32>,
}

impl Default for FrictionConfig {
    fn default() -> Self {
        Self {
            period: ParamRange::new(0.003, 0.009),
            frequency: ParamRange::new(100.0, 300.0),
            white_noise: 0.0,
            amplitude: 1.0,
            decay_time: 0.1,
            bandwidth: 0.3,
            stay_amplitude: 0.05,
            stay_decay_time: None,
        }
    }
}

/// How collisions are turned into independent bursts for the bank.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct BurstConfig {
    /// Cutoff in Hz.
    pub cutoff: ParamRange,
    pub bandwidth: ParamRange,
    pub decay_time: ParamRange,
    /// Slots in the physics → audio queue.
    pub queue_capacity: usize,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            cutoff: ParamRange::new(720.0, 9_600.0),
            bandwidth: ParamRange::new(0.1, 0.4),
            decay_time: ParamRange::new(0.1, 0.5),
            queue_capacity: MAX_IMPACTS,
        }
    }
}

/// Mixing and voice limits for the burst bank.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct BankConfig {
    pub gain_db: f32,
    /// Bursts quieter than this are freed.
    pub threshold_db: f32,
    pub max_impacts: usize,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            gain_db: 0.0,
            threshold_db: -60.0,
            max_impacts: 200,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactNoiseConfig {
    pub impact: ImpactConfig,
    pub friction: FrictionConfig,
    pub burst: BurstConfig,
    pub bank: BankConfig,
}

impl ContactNoiseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let impact = &self.impact;
        impact.decay_time.check("impact.decay_time")?;
        impact.frequency.check("impact.frequency")?;
        impact.bandwidth.check("impact.bandwidth")?;
        stable_bandwidth("impact.bandwidth.min", impact.bandwidth.min)?;
        stable_bandwidth("impact.bandwidth.max", impact.bandwidth.max)?;
        impact.amplitude.check("impact.amplitude")?;
        non_negative("impact.amplitude.min", impact.amplitude.min)?;

        let friction = &self.friction;
        friction.period.check("friction.period")?;
        if !(friction.period.min > 0.0) {
            return Err(ConfigError::NotPositive {
                name: "friction.period.min",
                value: friction.period.min,
            });
        }
        friction.frequency.check("friction.frequency")?;
        non_negative("friction.white_noise", friction.white_noise)?;
        non_negative("friction.amplitude", friction.amplitude)?;
        stable_bandwidth("friction.bandwidth", friction.bandwidth)?;
        non_negative("friction.stay_amplitude", friction.stay_amplitude)?;

        let burst = &self.burst;
        burst.cutoff.check("burst.cutoff")?;
        burst.bandwidth.check("burst.bandwidth")?;
        stable_bandwidth("burst.bandwidth.min", burst.bandwidth.min)?;
        stable_bandwidth("burst.bandwidth.max", burst.bandwidth.max)?;
        burst.decay_time.check("burst.decay_time")?;
        if burst.queue_capacity == 0 {
            return Err(ConfigError::OutOfBounds {
                name: "burst.queue_capacity",
                value: 0,
                min: 1,
                max: usize::MAX,
            });
        }

        if self.bank.max_impacts == 0 || self.bank.max_impacts > MAX_IMPACTS {
            return Err(ConfigError::OutOfBounds {
                name: "bank.max_impacts",
                value: self.bank.max_impacts,
                min: 1,
                max: MAX_IMPACTS,
            });
        }

        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `path`, falling back to defaults when it is missing or invalid.
    #[cfg(feature = "serde")]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "using default config");
                Self::default()
            }
        }
    }
}

fn stable_bandwidth(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=MAX_STABLE_BANDWIDTH).contains(&value) {
        return Err(ConfigError::UnstableBandwidth {
            name,
            value,
            max: MAX_STABLE_BANDWIDTH,
        });
    }
    Ok(())
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(value >= 0.0) {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}
