//! Output formatter trait

use quizbench_domain::{OutputFormat, ResultsSummary};

/// Trait for rendering a results summary
pub trait OutputFormatter {
    /// Format as a human-readable table
    fn format_table(&self, summary: &ResultsSummary) -> String;

    /// Format as JSON
    fn format_json(&self, summary: &ResultsSummary) -> String;

    /// Format in the requested output format
    fn render(&self, summary: &ResultsSummary, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => self.format_table(summary),
            OutputFormat::Json => self.format_json(summary),
        }
    }
}
