mod csv;
mod json;
mod text;

use chrono::Utc;
use serde::Serialize;

use crate::engine::SampleOutcome;
use crate::gesture::{Position, TiltAction};

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Reportable engine event
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", content = "value", rename_all = "lowercase")]
pub enum EventKind {
    Action(TiltAction),
    Position(Position),
    Calibrated(f32),
}

impl EventKind {
    pub fn label(&self) -> String {
        match self {
            Self::Action(action) => action.to_string(),
            Self::Position(position) => format!("position:{}", position),
            Self::Calibrated(_) => "calibrated".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EventOutput {
    pub t_ms: u64,
    pub kind: EventKind,
    pub raw: f32,
    pub smoothed: f32,
    pub delta: f32,
}

impl EventOutput {
    /// Events worth reporting for one processed reading
    ///
    /// Position changes are included only when `positions` is set.
    pub fn from_outcome(t_ms: u64, outcome: &SampleOutcome, positions: bool) -> Vec<Self> {
        let mut kinds = Vec::new();
        if outcome.calibration {
            kinds.push(EventKind::Calibrated(outcome.raw));
        }
        if positions && outcome.position_changed() {
            kinds.push(EventKind::Position(outcome.position));
        }
        if let Some(action) = outcome.action {
            kinds.push(EventKind::Action(action));
        }

        kinds
            .into_iter()
            .map(|kind| Self {
                t_ms,
                kind,
                raw: outcome.raw,
                smoothed: outcome.smoothed,
                delta: outcome.delta,
            })
            .collect()
    }
}

pub trait Formatter: Send {
    fn format(&self, output: &EventOutput) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
