//! contact - procedural impact and friction noise demo
//!
//! Run with: cargo run -- play

mod app;
mod condition;
mod scene;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use contact_noise::{conditioner::ConditionParams, dsp::NoiseSource, ContactNoiseConfig};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to config TOML
    #[arg(long, default_value = "contact.toml")]
    config: PathBuf,

    /// Noise seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the bouncing-crate scene on the default output device
    Play {
        #[arg(long, default_value_t = 10.0)]
        seconds: f32,
    },
    /// Render the scene offline to a WAV file
    Bounce {
        output: PathBuf,
        #[arg(long, default_value_t = 10.0)]
        seconds: f32,
        #[arg(long, default_value_t = 48_000)]
        sample_rate: u32,
    },
    /// Filter and normalize WAV samples
    Condition {
        /// Directory the conditioned files are written to
        #[arg(long, short)]
        output: PathBuf,
        #[arg(long, default_value_t = 0.0)]
        lowcut: f32,
        #[arg(long, default_value_t = 24_000.0)]
        highcut: f32,
        #[arg(long, default_value_t = 3)]
        order: usize,
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().ok();
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();

    let args = Args::parse();
    let config = ContactNoiseConfig::load_or_default(&args.config);
    let seed = args.seed.unwrap_or_else(|| NoiseSource::from_entropy().seed());

    match args.command {
        Command::Play { seconds } => app::play(&config, seed, seconds),
        Command::Bounce {
            output,
            seconds,
            sample_rate,
        } => app::bounce(&config, seed, seconds, sample_rate, &output),
        Command::Condition {
            output,
            lowcut,
            highcut,
            order,
            inputs,
        } => condition::run(
            &inputs,
            &output,
            ConditionParams {
                lowcut_hz: lowcut,
                highcut_hz: highcut,
                order,
            },
        ),
    }
}
