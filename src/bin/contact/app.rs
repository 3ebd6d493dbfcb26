//! Live playback and offline bounce of the simulated scene.

use std::path::Path;
use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use contact_noise::{
    contact::{self, burst},
    dsp::NoiseSource,
    engine::{ContactEngine, ImpactBank},
    ContactNoiseConfig, MAX_BLOCK_SIZE,
};

use super::scene::Scene;

/// Physics tick rate of the simulated scene.
const PHYSICS_HZ: f32 = 60.0;

/// Audio frames rendered per physics tick, never zero.
fn frames_per_tick(sample_rate: u32) -> usize {
    ((sample_rate as f32 / PHYSICS_HZ).round() as usize).max(1)
}

/// Everything the audio side owns.
struct Voices {
    engine: ContactEngine,
    bank: ImpactBank,
}

impl Voices {
    fn render(&mut self, data: &mut [f32], channels: usize) {
        self.engine.render(data, channels);
        self.bank.render(data, channels);
    }
}

/// Wire a scene to a fresh engine and bank at `sample_rate`.
fn build(
    config: &ContactNoiseConfig,
    sample_rate: f32,
    seed: u64,
) -> EyreResult<(Scene, contact::ContactSender, burst::ImpactTrigger, Voices)> {
    let (tx, rx) = contact::channel();
    let mut engine = ContactEngine::new(config, rx, NoiseSource::new(seed))
        .wrap_err("invalid contact noise config")?;
    engine.set_sample_rate(sample_rate);

    let (trigger, events) = burst::channel(&config.burst, sample_rate, NoiseSource::new(seed ^ 0x5EED));
    let bank = ImpactBank::new(&config.bank, events, NoiseSource::new(seed.rotate_left(17)));
    let scene = Scene::new(NoiseSource::new(seed.wrapping_add(1)));

    Ok((scene, tx, trigger, Voices { engine, bank }))
}

/// Play the scene on the default output device for `seconds`.
pub fn play(config: &ContactNoiseConfig, seed: u64, seconds: f32) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let supported = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;
    if supported.sample_format() != cpal::SampleFormat::F32 {
        return Err(eyre!(
            "unsupported sample format {:?}, need f32",
            supported.sample_format()
        ));
    }

    let sample_rate = supported.sample_rate().0 as f32;
    let channels = supported.channels() as usize;
    tracing::info!(sample_rate, channels, seed, "opening output stream");

    let (mut scene, tx, mut trigger, mut voices) = build(config, sample_rate, seed)?;

    let stream = device.build_output_stream(
        &supported.into(),
        move |data: &mut [f32], _| {
            data.fill(0.0);
            voices.render(data, channels);
        },
        |err| tracing::error!(%err, "audio stream error"),
        None,
    )?;
    stream.play()?;

    let physics = std::thread::Builder::new()
        .name("physics".into())
        .spawn(move || {
            let dt = 1.0 / PHYSICS_HZ;
            let tick = Duration::from_secs_f32(dt);
            let start = Instant::now();
            let mut next = start;
            while start.elapsed().as_secs_f32() < seconds {
                scene.step(dt, &tx, &mut trigger);
                next += tick;
                if let Some(wait) = next.checked_duration_since(Instant::now()) {
                    std::thread::sleep(wait);
                }
            }
            tracing::info!(
                landings = scene.landings(),
                dropped = trigger.dropped(),
                "scene finished"
            );
        })
        .wrap_err("failed to spawn physics thread")?;

    physics
        .join()
        .map_err(|_| eyre!("physics thread panicked"))?;
    drop(stream);
    Ok(())
}

/// Render `seconds` of the scene offline into a 32-bit float WAV file.
pub fn bounce(
    config: &ContactNoiseConfig,
    seed: u64,
    seconds: f32,
    sample_rate: u32,
    output: &Path,
) -> EyreResult<()> {
    const CHANNELS: usize = 2;

    let (mut scene, tx, mut trigger, mut voices) = build(config, sample_rate as f32, seed)?;

    let spec = hound::WavSpec {
        channels: CHANNELS as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(output, spec)
        .wrap_err_with(|| format!("failed to create {}", output.display()))?;

    let dt = 1.0 / PHYSICS_HZ;
    let frames_per_tick = frames_per_tick(sample_rate);
    let total_frames = (seconds * sample_rate as f32) as usize;
    let mut block = vec![0.0f32; MAX_BLOCK_SIZE * CHANNELS];
    let mut peak = 0.0f32;

    let mut written = 0;
    while written < total_frames {
        scene.step(dt, &tx, &mut trigger);

        let mut remaining = frames_per_tick.min(total_frames - written);
        while remaining > 0 {
            let frames = remaining.min(MAX_BLOCK_SIZE);
            let buf = &mut block[..frames * CHANNELS];
            buf.fill(0.0);
            voices.render(buf, CHANNELS);
            for &s in buf.iter() {
                peak = peak.max(s.abs());
                writer.write_sample(s)?;
            }
            remaining -= frames;
            written += frames;
        }
    }
    writer.finalize()?;

    tracing::info!(
        path = %output.display(),
        frames = written,
        peak,
        landings = scene.landings(),
        "bounce written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_per_tick() {
        assert_eq!(frames_per_tick(48_000), 800);
        assert_eq!(frames_per_tick(44_100), 735);
        assert_eq!(frames_per_tick(29), 1);
        assert_eq!(frames_per_tick(1), 1);
    }

    #[test]
    fn test_bounce_at_tiny_sample_rate_terminates() {
        let path = std::env::temp_dir().join("contact_bounce_low_rate.wav");
        bounce(&ContactNoiseConfig::default(), 1, 1.0, 10, &path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.duration(), 10);
        std::fs::remove_file(&path).ok();
    }
}
