//! Recorded tilt trace format
//!
//! One reading per line as `t_ms,beta`. Blank lines and lines starting with
//! `#` are ignored. An empty or `null` beta records a reading that arrived
//! without an angle:
//!
//! ```text
//! # t_ms,beta
//! 0,2.5
//! 40,null
//! 80,61.0
//! ```

use std::fmt::Write as _;

use super::{TiltReading, TimedReading};
use crate::error::{Result, TiltError};

/// Parse a whole trace document
pub fn parse_trace(content: &str) -> Result<Vec<TimedReading>> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| parse_trace_line(line, i + 1).transpose())
        .collect()
}

/// Parse one line; `Ok(None)` for comments and blank lines
pub fn parse_trace_line(line: &str, line_number: usize) -> Result<Option<TimedReading>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let parse_error = |message: String| TiltError::TraceParse {
        line: line_number,
        message,
    };

    let (t, beta) = line
        .split_once(',')
        .ok_or_else(|| parse_error(format!("expected t_ms,beta, got {:?}", line)))?;

    let t_ms: u64 = t
        .trim()
        .parse()
        .map_err(|_| parse_error(format!("invalid timestamp {:?}", t.trim())))?;

    let beta = match beta.trim() {
        "" | "null" | "NULL" => None,
        value => Some(
            value
                .parse::<f32>()
                .map_err(|_| parse_error(format!("invalid angle {:?}", value)))?,
        ),
    };

    Ok(Some(TimedReading {
        t_ms,
        reading: TiltReading { beta },
    }))
}

/// Render readings in the trace format, with a header comment
pub fn format_trace(readings: &[TimedReading]) -> String {
    let mut out = String::from("# t_ms,beta\n");
    for r in readings {
        let _ = match r.reading.beta {
            Some(beta) => writeln!(out, "{},{:.2}", r.t_ms, beta),
            None => writeln!(out, "{},null", r.t_ms),
        };
    }
    out
}
