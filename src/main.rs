use anyhow::Context;
use clap::Parser;
use rolling_stats::Stats;
use serde::Serialize;
use std::path::{Path, PathBuf};

use tiltguess::action::ActionRecorder;
use tiltguess::clock::ManualClock;
use tiltguess::config::{GestureConfig, Thresholds};
use tiltguess::output::{EventOutput, OutputFormat, create_formatter};
use tiltguess::permission::NoPermissionRequired;
use tiltguess::sensor::{SensorBus, TiltSource, TraceFileSource};
use tiltguess::{TiltAction, TiltEngine};

#[derive(Parser, Debug)]
#[command(name = "tiltguess")]
#[command(about = "Replay recorded tilt traces through the gesture engine", long_about = None)]
struct Args {
    /// Trace files (t_ms,beta per line)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// TOML gesture configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Neutral/action thresholds in degrees (e.g., "15/45")
    #[arg(short, long)]
    thresholds: Option<Thresholds>,

    /// Output format: text, json, csv
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also report position changes
    #[arg(short, long)]
    positions: bool,

    /// Skip the calibration normally taken from the first reading
    #[arg(long)]
    no_calibrate: bool,

    /// Print a JSON summary per file instead of event lines
    #[arg(long)]
    summary_only: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Serialize)]
struct DeltaSummary {
    count: usize,
    mean: f32,
    std_dev: f32,
    min: f32,
    max: f32,
}

impl DeltaSummary {
    fn from_stats(stats: &Stats<f32>) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        Some(Self {
            count: stats.count,
            mean: stats.mean,
            std_dev: stats.std_dev,
            min: stats.min,
            max: stats.max,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
struct ReplaySummary {
    filename: String,
    readings: usize,
    missing_angles: usize,
    correct: usize,
    skip: usize,
    baseline: f32,
    delta: Option<DeltaSummary>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = match &args.config {
        Some(path) => GestureConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GestureConfig::default(),
    };
    if let Some(thresholds) = args.thresholds {
        config.set_thresholds(thresholds);
    }
    config.enabled = true;

    let formatter = create_formatter(args.format, args.verbose > 0);
    if let (false, Some(header)) = (args.summary_only, formatter.header()) {
        println!("{}", header);
    }

    let mut summaries = Vec::new();
    for path in &args.files {
        let summary = replay_file(path, &config, &args, |event| {
            if !args.summary_only {
                println!("{}", formatter.format(event));
            }
        })
        .with_context(|| format!("Failed to replay {}", path.display()))?;
        summaries.push(summary);
    }

    if args.summary_only {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for summary in &summaries {
            log::info!(
                "{}: {} readings, {} correct, {} skip",
                summary.filename,
                summary.readings,
                summary.correct,
                summary.skip
            );
        }
    }

    Ok(())
}

fn replay_file(
    path: &Path,
    config: &GestureConfig,
    args: &Args,
    mut emit: impl FnMut(&EventOutput),
) -> anyhow::Result<ReplaySummary> {
    let mut source = TraceFileSource::open(path)?;
    let readings = source.len();

    let clock = ManualClock::new(0);
    let bus = SensorBus::new();
    let mut engine = TiltEngine::with_clock(config.clone(), ActionRecorder::new(), clock.clone())?;

    let mut provider = NoPermissionRequired;
    engine.probe_capability(&provider);
    if !args.no_calibrate {
        engine.request_permission(&mut provider);
    }
    if !engine.sync_enabled(&bus) {
        anyhow::bail!("engine refused to enable");
    }

    let mut delta_stats: Stats<f32> = Stats::new();
    let mut missing_angles = 0;

    while let Some(timed) = source.next_reading()? {
        if timed.reading.beta.is_none() {
            missing_angles += 1;
        }

        clock.set(timed.t_ms);
        bus.publish(timed.reading);

        for outcome in engine.pump() {
            if !outcome.calibration {
                delta_stats.update(outcome.delta);
            }
            for event in EventOutput::from_outcome(timed.t_ms, &outcome, args.positions) {
                emit(&event);
            }
        }
    }

    let baseline = engine.snapshot().baseline;
    engine.disable();
    let recorder = engine.into_sink();

    Ok(ReplaySummary {
        filename: path.display().to_string(),
        readings,
        missing_angles,
        correct: recorder.count(TiltAction::Correct),
        skip: recorder.count(TiltAction::Skip),
        baseline,
        delta: DeltaSummary::from_stats(&delta_stats),
    })
}
