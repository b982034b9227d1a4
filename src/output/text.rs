use super::{EventOutput, Formatter};

pub struct TextFormatter {
    verbose: bool,
}

impl TextFormatter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, output: &EventOutput) -> String {
        if self.verbose {
            format!(
                "[{:>8} ms] {:<16} raw: {:>6.1}° smoothed: {:>6.1}° delta: {:>+6.1}°",
                output.t_ms,
                output.kind.label(),
                output.raw,
                output.smoothed,
                output.delta
            )
        } else {
            format!("[{:>8} ms] {}", output.t_ms, output.kind.label())
        }
    }
}
