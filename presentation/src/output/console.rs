//! Console output formatter for session reports

use crate::output::formatter::OutputFormatter;
use blackboard_application::SessionReport;
use blackboard_domain::core::string::truncate;
use blackboard_domain::{ConsensusRecord, Message, Priority};
use colored::{ColoredString, Colorize};

/// Longest payload shown per conversation line
const PAYLOAD_PREVIEW_CHARS: usize = 100;

/// Formats session reports for console display
pub struct ConsoleFormatter;

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &SessionReport) -> String {
        let mut output = self.format_summary(report);

        if !report.highlights.is_empty() {
            output.push_str(&Self::section_header("Highlights"));
            for highlight in &report.highlights {
                output.push_str(&format!("  * {}\n", highlight));
            }
        }

        if report.has_failures() {
            output.push_str(&Self::section_header("Delivery Failures"));
            for failure in &report.failures {
                output.push_str(&format!(
                    "  {} {} on {}: {}\n",
                    "x".red().bold(),
                    failure.subscriber.as_str().yellow(),
                    failure.topic,
                    failure.error
                ));
            }
        }

        if !report.warnings.is_empty() {
            output.push_str(&Self::section_header("Skipped Steps"));
            for warning in &report.warnings {
                output.push_str(&format!(
                    "  {} step {} ({}): {}\n",
                    "!".yellow().bold(),
                    warning.index,
                    warning.action,
                    warning.reason
                ));
            }
        }

        output.push_str(&Self::section_header("Conversation"));
        for message in &report.conversation {
            output.push_str(&Self::conversation_line(message));
        }

        output.push_str(&Self::footer());
        output
    }

    fn format_json(&self, report: &SessionReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_summary(&self, report: &SessionReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Blackboard Session Report"));
        output.push('\n');

        if let Some(name) = &report.name {
            output.push_str(&format!("{} {}\n", "Session:".cyan().bold(), name));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Steps run:".cyan().bold(),
            report.steps_run
        ));

        let summary = &report.summary;
        output.push_str(&Self::section_header("Agent Communication"));
        output.push_str(&format!("  Total messages:   {}\n", summary.total_messages));
        output.push_str(&format!(
            "  Critical alerts:  {}\n",
            Self::count(summary.critical_alerts, |s| s.red().bold())
        ));
        output.push_str(&format!("  Questions asked:  {}\n", summary.questions_asked));
        output.push_str(&format!(
            "  Consensus topics: {}\n",
            Self::count(summary.consensus_topics, |s| s.green().bold())
        ));

        output.push_str(&Self::section_header("Consensus"));
        if report.consensus.is_empty() {
            output.push_str(&format!("  {}\n", "No topic reached the threshold".dimmed()));
        }
        for record in &report.consensus {
            output.push_str(&Self::consensus_line(record));
        }

        output
    }
}

impl ConsoleFormatter {
    fn consensus_line(record: &ConsensusRecord) -> String {
        let agents: Vec<&str> = record.supporting_agents.iter().map(|a| a.as_str()).collect();
        let mut line = format!(
            "  {}: {} ({:.0}% confidence, {} of {} opinions",
            record.topic.bold(),
            record.consensus.green(),
            record.confidence * 100.0,
            agents.len(),
            record.opinion_count
        );
        if record.dissenting_groups > 0 {
            line.push_str(&format!(
                ", {} dissenting {}",
                record.dissenting_groups,
                if record.dissenting_groups == 1 { "group" } else { "groups" }
            ));
        }
        line.push_str(&format!(")\n    supported by {}\n", agents.join(", ")));
        line
    }

    fn conversation_line(message: &Message) -> String {
        let priority = match message.priority() {
            Priority::Critical => message.priority().as_str().to_uppercase().red().bold(),
            Priority::High => message.priority().as_str().yellow(),
            _ => message.priority().as_str().dimmed(),
        };
        format!(
            "  [{}] {} -> {} ({}): {}\n",
            priority,
            message.publisher().as_str().cyan(),
            message.topic(),
            message.kind(),
            truncate(&message.payload_text(), PAYLOAD_PREVIEW_CHARS)
        )
    }

    fn count(value: usize, style: impl Fn(&str) -> ColoredString) -> String {
        if value == 0 {
            value.to_string()
        } else {
            style(&value.to_string()).to_string()
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
