use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

use tiltguess::sensor::format_trace;
use tiltguess::simulation::{GestureDirection, TraceNoiseConfig, TraceScript};

#[derive(Parser, Debug)]
#[command(name = "generate_trace")]
#[command(about = "Generate synthetic tilt traces for replay and testing")]
struct Args {
    /// Gestures: comma-separated up/down (e.g., "up,down,up")
    #[arg(short, long, default_value = "up,down")]
    gestures: String,

    /// Output trace file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML noise configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Neutral device angle in degrees
    #[arg(long, default_value_t = 0.0)]
    level: f32,

    /// Gesture amplitude in degrees
    #[arg(short, long, default_value_t = 70.0)]
    amplitude: f32,

    /// How long each gesture is held, in milliseconds
    #[arg(long, default_value_t = 400)]
    hold_ms: u64,

    /// Level lead-in before the first gesture, in milliseconds
    #[arg(long, default_value_t = 500)]
    lead_in_ms: u64,

    /// Reading interval in milliseconds
    #[arg(long, default_value_t = 20)]
    interval_ms: u64,

    /// Gaussian jitter standard deviation in degrees (CLI override)
    #[arg(short, long)]
    jitter: Option<f32>,

    /// Probability of a reading with no angle (CLI override)
    #[arg(long)]
    dropout: Option<f32>,

    /// Seed for reproducibility (CLI override)
    #[arg(short, long)]
    seed: Option<u64>,
}

fn parse_gestures(s: &str) -> Result<Vec<GestureDirection>> {
    s.split(',')
        .filter(|p| !p.trim().is_empty())
        .map(|p| p.parse::<GestureDirection>().map_err(anyhow::Error::msg))
        .collect()
}

fn load_noise_config(path: &PathBuf) -> Result<TraceNoiseConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut noise = match &args.config {
        Some(path) => load_noise_config(path)?,
        None => TraceNoiseConfig::default(),
    };
    if let Some(jitter) = args.jitter {
        noise.jitter_std_deg = jitter;
    }
    if let Some(dropout) = args.dropout {
        noise.dropout_probability = dropout;
    }
    if args.seed.is_some() {
        noise.seed = args.seed;
    }
    noise.validate().context("Invalid noise settings")?;

    let gestures = parse_gestures(&args.gestures)?;

    let script = gestures.iter().fold(
        TraceScript::new(args.level)
            .sample_interval_ms(args.interval_ms)
            .with_noise(noise)
            .hold(args.level, args.lead_in_ms),
        |script, &direction| script.gesture(direction, args.amplitude, args.hold_ms),
    );

    let readings = script.generate();
    let text = format_trace(&readings);

    match &args.output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!(
                "Wrote {} readings ({} gestures, {} ms) to {}",
                readings.len(),
                gestures.len(),
                script.duration_ms(),
                path.display()
            );
        }
        None => print!("{}", text),
    }

    Ok(())
}
