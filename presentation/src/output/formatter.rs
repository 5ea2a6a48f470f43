//! Output formatter trait

use crate::cli::commands::OutputFormat;
use blackboard_application::SessionReport;

/// Trait for formatting session reports
pub trait OutputFormatter {
    /// Format the complete report, conversation included
    fn format(&self, report: &SessionReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &SessionReport) -> String;

    /// Format the communication summary and consensus only
    fn format_summary(&self, report: &SessionReport) -> String;

    /// Dispatch on the requested format
    fn render(&self, report: &SessionReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(report),
            OutputFormat::Summary => self.format_summary(report),
            OutputFormat::Json => self.format_json(report),
        }
    }
}
