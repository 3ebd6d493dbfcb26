//! Geometric decay shared by the impact and friction envelopes.

/// Added after every decay step so the amplitude never sinks into denormals.
pub const DENORMAL_FLOOR: f32 = 1.0e-9;

/// Per-sample multiplier that reaches `1/e` after `decay_time` seconds.
///
/// A non-positive (or NaN) decay time means instant silence.
#[inline]
pub fn decay_constant(decay_time: f32, sample_rate: f32) -> f32 {
    if !(decay_time > 0.0) || !(sample_rate > 0.0) {
        return 0.0;
    }
    (-1.0 / (decay_time * sample_rate)).exp()
}

/// Energy normalization for a band-passed noise source of the given bandwidth.
#[inline]
pub fn bandwidth_norm(bandwidth: f32) -> f32 {
    (bandwidth.abs() * 0.5 + 0.001).sqrt()
}

/// One decay step with the denormal floor.
#[inline]
pub fn step(amplitude: f32, decay: f32) -> f32 {
    amplitude * decay + DENORMAL_FLOOR
}
