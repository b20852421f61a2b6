use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::processor::RunReport;
use crate::utils::{format_duration, preview};

/// Human-readable progress lines for the row loop
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    fn line(&self, text: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", text.as_ref());
        }
    }

    pub fn sheet_loaded(&self, rows: &[Vec<String>]) {
        self.line(format!("Rows fetched: {}", rows.len()));
        if let Some(header) = rows.first() {
            self.line(format!("Header: {:?}", header));
        }
    }

    pub fn row_started(&self, sheet_row: usize, url: &str) {
        self.line(format!("\nProcessing row {}: {}", style(sheet_row).bold(), url));
    }

    pub fn skipped(&self) {
        self.line(format!("{} Skipped (result column already filled)", style("🔄").cyan()));
    }

    pub fn url_error(&self) {
        self.line(format!("{} Could not find a video id in the URL", style("⚠️").yellow()));
    }

    pub fn no_transcript(&self) {
        self.line(format!("{} No transcript available", style("⚠️").yellow()));
    }

    pub fn summarized(&self, summary: &str) {
        self.line(format!(
            "{} Summary ready, writing: {}",
            style("✅").green(),
            style(preview(summary, 60)).dim()
        ));
    }

    pub fn summary_failed(&self, message: &str) {
        self.line(format!("{} Summarization failed: {}", style("❌").red(), message));
    }

    /// Spinner shown while waiting on a slow external call
    pub fn spinner(&self, message: &'static str) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            progress.set_style(spinner_style);
        }
        progress.set_message(message);
        progress.enable_steady_tick(Duration::from_millis(120));
        progress
    }

    pub fn finished(&self, report: &RunReport) {
        let elapsed = (report.finished_at - report.started_at)
            .to_std()
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();

        self.line(format!(
            "\n{} rows in {}: {} summarized, {} skipped, {} URL errors, {} without transcript, {} summary errors",
            report.total(),
            format_duration(elapsed),
            style(report.summarized).green(),
            report.skipped,
            report.url_errors,
            report.no_transcript,
            style(report.summary_errors).red(),
        ));
    }
}
