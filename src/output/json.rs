use serde::Serialize;

use super::{EventOutput, Formatter, iso8601_timestamp};

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonLine<'a> {
    ts: String,
    #[serde(flatten)]
    event: &'a EventOutput,
}

impl Formatter for JsonFormatter {
    fn format(&self, output: &EventOutput) -> String {
        let line = JsonLine {
            ts: iso8601_timestamp(),
            event: output,
        };
        serde_json::to_string(&line).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
    }
}
