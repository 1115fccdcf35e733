//! Console output formatter for evaluation results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use quizbench_application::{EvaluationReport, ImportReport, ImportStatus};
use quizbench_domain::core::string::{single_line, truncate};
use quizbench_domain::{ConfigIssue, Domain, Question, ResultsSummary, Severity};

const PROMPT_WIDTH: usize = 70;

/// Formats results, question listings and reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the summary as a table
    pub fn format_summary(summary: &ResultsSummary) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Evaluation Results"));
        output.push('\n');

        output.push_str(&format!(
            "{:<20} {:>9} {:>8} {:>9} {:>13}\n",
            "Domain", "Answered", "Correct", "Accuracy", "Avg latency"
        ));
        output.push_str(&format!("{}\n", "-".repeat(63)));

        for d in &summary.domains {
            output.push_str(&format!(
                "{:<20} {:>9} {:>8} {:>9} {:>13}\n",
                d.domain.display_name(),
                d.total_questions,
                d.total_correct,
                format_pct(d.accuracy_pct),
                format_ms(d.avg_response_time_ms)
            ));
        }

        let overall = &summary.overall;
        output.push_str(&format!("{}\n", "-".repeat(63)));
        output.push_str(&format!(
            "{:<20} {:>9} {:>8} {:>9} {:>13}\n",
            "Overall".bold(),
            overall.total_questions,
            overall.total_correct,
            format_pct(overall.accuracy_pct),
            format_ms(overall.avg_response_time_ms)
        ));

        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Best domain:".cyan().bold(),
            format_domain(overall.best_domain)
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Slowest domain:".cyan().bold(),
            format_domain(overall.slowest_domain)
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(summary: &ResultsSummary) -> String {
        serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
    }

    /// List a domain's questions with the recorded and expected answers
    pub fn format_questions(domain: Domain, questions: &[Question]) -> String {
        let mut output = String::new();
        output.push_str(&Self::section_header(&format!(
            "{} ({} question(s))",
            domain.display_name(),
            questions.len()
        )));

        for q in questions {
            let mark = match q.is_correct() {
                Some(true) => "v".green(),
                Some(false) => "x".red(),
                None => "-".dimmed(),
            };
            output.push_str(&format!(
                "{} {:>5}  {}\n",
                mark,
                format!("#{}", q.id),
                truncate(&single_line(&q.prompt_text), PROMPT_WIDTH)
            ));
            let latency = q
                .response_time_ms
                .map(|ms| format!("  {:.0} ms", ms))
                .unwrap_or_default();
            output.push_str(&format!(
                "         model: {}  expected: {}{}\n",
                q.model_response.as_deref().unwrap_or("-"),
                q.expected_answer,
                latency.dimmed()
            ));
        }
        output
    }

    /// One-line summary of an evaluation pass
    pub fn format_report(report: &EvaluationReport) -> String {
        let status = if report.cancelled {
            "Cancelled".yellow().bold()
        } else {
            "Completed".green().bold()
        };
        let mut line = format!(
            "{}: {} processed, {} failed, {} unparseable",
            status, report.total_processed, report.failed, report.unparseable
        );
        if !report.failed_domains.is_empty() {
            let names: Vec<_> = report
                .failed_domains
                .iter()
                .map(|d| d.display_name())
                .collect();
            line.push_str(&format!(" (skipped: {})", names.join(", ")));
        }
        line
    }

    /// Per-domain import results
    pub fn format_import(report: &ImportReport) -> String {
        let mut output = String::new();
        for (domain, status) in &report.entries {
            let mark = match status {
                ImportStatus::Inserted(_) => "v".green(),
                ImportStatus::AlreadyPopulated(_) | ImportStatus::SourceEmpty => "-".dimmed(),
                ImportStatus::Failed(_) => "x".red(),
            };
            output.push_str(&format!(
                "  {} {:<18} {}\n",
                mark,
                domain.display_name(),
                status
            ));
        }
        output
    }

    /// Configuration problems, errors first
    pub fn format_config_issues(issues: &[ConfigIssue]) -> String {
        let mut sorted: Vec<_> = issues.iter().collect();
        sorted.sort_by_key(|issue| !issue.is_error());
        sorted
            .into_iter()
            .map(|issue| match issue.severity {
                Severity::Error => format!("{} {}", "error:".red().bold(), issue.message),
                Severity::Warning => format!("{} {}", "warning:".yellow().bold(), issue.message),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(63);
        format!("{}\n{:^63}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(63).cyan())
    }
}

fn format_pct(pct: f64) -> String {
    format!("{:.1}%", pct)
}

fn format_ms(ms: Option<f64>) -> String {
    ms.map(|ms| format!("{:.0} ms", ms))
        .unwrap_or_else(|| "-".to_string())
}

fn format_domain(domain: Option<Domain>) -> String {
    domain
        .map(|d| d.display_name().to_string())
        .unwrap_or_else(|| "n/a".to_string())
}

impl OutputFormatter for ConsoleFormatter {
    fn format_table(&self, summary: &ResultsSummary) -> String {
        Self::format_summary(summary)
    }

    fn format_json(&self, summary: &ResultsSummary) -> String {
        Self::format_json(summary)
    }
}
