//! `contact condition`: run WAV files through the sample conditioner.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result as EyreResult, WrapErr};

use contact_noise::conditioner::{ConditionParams, SampleBuffer, SampleSink, SampleUploader};

/// Writes each uploaded sample to `<dir>/<index>_<name>.wav`.
struct WavSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl SampleSink for WavSink {
    type Error = hound::Error;

    fn upload(&mut self, index: usize, sample: SampleBuffer) -> Result<(), Self::Error> {
        let path = self.dir.join(format!("{index:03}_{}.wav", sample.name()));
        let spec = hound::WavSpec {
            channels: sample.channels() as u16,
            sample_rate: sample.sample_rate(),
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec)?;
        for &s in sample.samples() {
            writer.write_sample(s)?;
        }
        writer.finalize()?;
        self.written.push(path);
        Ok(())
    }
}

/// Decode a WAV file into an interleaved float buffer.
///
/// Unreadable files are logged and come back as `None`, leaving an empty
/// slot for the uploader to skip.
fn read_wav(path: &Path) -> Option<SampleBuffer> {
    let decode = || -> EyreResult<SampleBuffer> {
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let data: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()?
            }
        };
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sample".to_owned());
        Ok(SampleBuffer::new(
            data,
            spec.channels as usize,
            spec.sample_rate,
            name,
        )?)
    };

    match decode() {
        Ok(sample) => Some(sample),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "skipping unreadable sample");
            None
        }
    }
}

pub fn run(inputs: &[PathBuf], output: &Path, params: ConditionParams) -> EyreResult<()> {
    std::fs::create_dir_all(output)
        .wrap_err_with(|| format!("failed to create {}", output.display()))?;

    let mut sink = WavSink {
        dir: output.to_path_buf(),
        written: Vec::with_capacity(inputs.len()),
    };
    let mut uploader = SampleUploader::new(0, params);
    let samples = inputs.iter().map(|path| read_wav(path));
    uploader
        .upload_all(samples, &mut sink)
        .wrap_err("failed to write conditioned sample")?;

    for path in &sink.written {
        println!("{}", path.display());
    }
    tracing::info!(
        written = sink.written.len(),
        skipped = inputs.len() - sink.written.len(),
        "conditioning done"
    );
    Ok(())
}
