use crate::error::SampleError;

/// A fully buffered, interleaved audio sample on its way to a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    data: Vec<f32>,
    channels: usize,
    sample_rate: u32,
    name: String,
}

impl SampleBuffer {
    pub fn new(
        data: Vec<f32>,
        channels: usize,
        sample_rate: u32,
        name: impl Into<String>,
    ) -> Result<Self, SampleError> {
        if channels == 0 {
            return Err(SampleError::NoChannels);
        }
        if sample_rate == 0 {
            return Err(SampleError::InvalidSampleRate(sample_rate));
        }
        if data.len() % channels != 0 {
            return Err(SampleError::PartialFrame {
                len: data.len(),
                channels,
            });
        }
        Ok(Self {
            data,
            channels,
            sample_rate,
            name: name.into(),
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frames(&self) -> usize {
        self.data.len() / self.channels
    }

    pub fn samples(&self) -> &[f32] {
        &self.data
    }

    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Iterate one channel of the interleaved data.
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().skip(channel).step_by(self.channels).copied()
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.data
    }
}
