//! Progress reporting for evaluation passes

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use quizbench_application::ports::progress::ProgressPublisher;
use quizbench_domain::{Domain, ProgressEvent, QuestionId};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with one spinner per domain
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {pos} answered {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start_domain(&self, domain: Domain) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(domain.display_name().to_string());
        pb.set_message("Starting...");
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut slot) = self.bar.lock()
            && let Some(previous) = slot.replace(pb)
        {
            previous.finish_with_message(format!("{}", "done".green()));
        }
    }

    fn finish_domain(&self, message: String) {
        if let Ok(mut slot) = self.bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(message);
        }
    }

    /// Print a line above the spinner (or plainly when none is active)
    fn println(&self, line: String) {
        if let Ok(slot) = self.bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            pb.println(line);
            return;
        }
        eprintln!("{}", line);
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(slot) = self.bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressPublisher for ProgressReporter {
    fn publish(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::Started { domain } => self.start_domain(*domain),
            ProgressEvent::NoWork { .. } => {
                self.finish_domain(format!("{}", "nothing to do".dimmed()))
            }
            ProgressEvent::QuestionOk {
                question_id,
                latency_ms,
                answer,
                ..
            } => self.with_bar(|pb| {
                pb.inc(1);
                pb.set_message(format!(
                    "{} #{} {} ({:.0} ms)",
                    "v".green(),
                    question_id,
                    answer,
                    latency_ms
                ));
            }),
            ProgressEvent::QuestionFailed {
                question_id, error, ..
            } => self.println(question_line("x".red().to_string(), *question_id, error)),
            ProgressEvent::InvalidAnswer {
                question_id, raw, ..
            } => self.println(question_line(
                "?".yellow().to_string(),
                *question_id,
                &format!("no A-D letter in {:?}", raw),
            )),
            ProgressEvent::DomainFailed { domain, error } => {
                self.finish_domain(format!("{}", "skipped".red()));
                self.println(format!("  {} {}: {}", "x".red(), domain.display_name(), error));
            }
            ProgressEvent::Completed { total_processed } => {
                self.finish_domain(format!("{}", "done".green()));
                eprintln!(
                    "{} {} answer(s) recorded",
                    "Evaluation complete:".green().bold(),
                    total_processed
                );
            }
            ProgressEvent::Cancelled { total_processed } => {
                self.finish_domain(format!("{}", "cancelled".yellow()));
                eprintln!(
                    "{} {} answer(s) recorded before stopping",
                    "Evaluation cancelled:".yellow().bold(),
                    total_processed
                );
            }
        }
    }
}

fn question_line(mark: String, question_id: QuestionId, detail: &str) -> String {
    format!("  {} #{} {}", mark, question_id, detail)
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl SimpleProgress {
    /// The line printed for an event
    pub fn line(event: &ProgressEvent) -> String {
        match event {
            ProgressEvent::Started { domain } => {
                format!("{} {}", "->".cyan(), domain.display_name().bold())
            }
            ProgressEvent::NoWork { .. } => format!("  {}", "no unanswered questions".dimmed()),
            ProgressEvent::QuestionOk {
                question_id,
                latency_ms,
                answer,
                ..
            } => format!(
                "  {} #{} {} ({:.0} ms)",
                "v".green(),
                question_id,
                answer,
                latency_ms
            ),
            ProgressEvent::QuestionFailed {
                question_id, error, ..
            } => question_line("x".red().to_string(), *question_id, error),
            ProgressEvent::InvalidAnswer {
                question_id, raw, ..
            } => question_line(
                "?".yellow().to_string(),
                *question_id,
                &format!("no A-D letter in {:?}", raw),
            ),
            ProgressEvent::DomainFailed { error, .. } => {
                format!("  {} skipped: {}", "x".red(), error)
            }
            ProgressEvent::Completed { total_processed } => {
                format!("{} {} answer(s) recorded", "Done:".green().bold(), total_processed)
            }
            ProgressEvent::Cancelled { total_processed } => format!(
                "{} {} answer(s) recorded",
                "Cancelled:".yellow().bold(),
                total_processed
            ),
        }
    }
}

impl ProgressPublisher for SimpleProgress {
    fn publish(&self, event: &ProgressEvent) {
        println!("{}", Self::line(event));
    }
}
