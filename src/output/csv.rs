use super::{EventOutput, Formatter, iso8601_timestamp};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format(&self, output: &EventOutput) -> String {
        format!(
            "{},{},{},{:.2},{:.2},{:.2}",
            iso8601_timestamp(),
            output.t_ms,
            output.kind.label(),
            output.raw,
            output.smoothed,
            output.delta
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("ts,t_ms,event,raw,smoothed,delta")
    }
}
