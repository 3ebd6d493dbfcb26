use super::{condition, ConditionParams, SampleBuffer};

/// Consumer of conditioned samples (an engine's sample table, a file, ...).
pub trait SampleSink {
    type Error;

    fn upload(&mut self, index: usize, sample: SampleBuffer) -> Result<(), Self::Error>;
}

impl SampleSink for Vec<(usize, SampleBuffer)> {
    type Error = std::convert::Infallible;

    fn upload(&mut self, index: usize, sample: SampleBuffer) -> Result<(), Self::Error> {
        self.push((index, sample));
        Ok(())
    }
}

/// Conditions a batch of samples and uploads them under consecutive slots.
#[derive(Debug, Clone)]
pub struct SampleUploader {
    next_index: usize,
    params: ConditionParams,
}

impl SampleUploader {
    pub fn new(first_index: usize, params: ConditionParams) -> Self {
        Self {
            next_index: first_index,
            params,
        }
    }

    /// Condition and upload every present sample; empty slots are skipped
    /// without consuming an index.
    ///
    /// Stops at the first sink error. Returns the next free slot index.
    pub fn upload_all<S, I>(&mut self, samples: I, sink: &mut S) -> Result<usize, S::Error>
    where
        S: SampleSink,
        I: IntoIterator<Item = Option<SampleBuffer>>,
    {
        for mut sample in samples.into_iter().flatten() {
            condition(&mut sample, &self.params);
            let index = self.next_index;
            tracing::info!(index, name = sample.name(), "uploading sample");
            sink.upload(index, sample)?;
            self.next_index += 1;
        }
        Ok(self.next_index)
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn params(&self) -> &ConditionParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(name: &str, value: f32) -> SampleBuffer {
        SampleBuffer::new(vec![value, -value, value * 0.5, 0.0], 1, 48_000, name).unwrap()
    }

    #[test]
    fn test_skips_empty_slots() {
        let mut uploader = SampleUploader::new(4, ConditionParams::default());
        let mut sink: Vec<(usize, SampleBuffer)> = Vec::new();

        let next = uploader
            .upload_all(vec![Some(clip("a", 0.5)), None, Some(clip("b", 0.25))], &mut sink)
            .unwrap();

        assert_eq!(next, 6);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].0, 4);
        assert_eq!(sink[0].1.name(), "a");
        assert_eq!(sink[1].0, 5);
        assert_eq!(sink[1].1.name(), "b");
    }

    #[test]
    fn test_sink_error_stops_batch() {
        struct Full;
        impl SampleSink for Full {
            type Error = &'static str;
            fn upload(&mut self, _index: usize, _sample: SampleBuffer) -> Result<(), Self::Error> {
                Err("full")
            }
        }

        let mut uploader = SampleUploader::new(0, ConditionParams::default());
        let err = uploader
            .upload_all(vec![Some(clip("a", 0.5))], &mut Full)
            .unwrap_err();
        assert_eq!(err, "full");
        assert_eq!(uploader.next_index(), 0);
    }

    #[test]
    fn test_uploaded_samples_are_conditioned() {
        let params = ConditionParams {
            lowcut_hz: 0.0,
            highcut_hz: 4_000.0,
            order: 1,
        };
        let mut uploader = SampleUploader::new(0, params);
        let mut sink: Vec<(usize, SampleBuffer)> = Vec::new();
        uploader
            .upload_all(vec![Some(clip("a", 0.1))], &mut sink)
            .unwrap();

        let peak = sink[0]
            .1
            .samples()
            .iter()
            .fold(0.0f32, |p, s| p.max(s.abs()));
        assert_eq!(peak, 1.0);
    }
}
