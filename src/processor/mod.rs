use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::{Config, SheetConfig};
use crate::output::ConsoleReporter;
use crate::sheets::RowStore;
use crate::summarize::Summarizer;
use crate::youtube::{extract_video_id, TranscriptFetcher};
use crate::Result;

/// Written when no video id can be extracted from the URL cell
pub const URL_ERROR_MARKER: &str = "⚠️ URLエラー";

/// Written when every transcript attempt failed
pub const NO_TRANSCRIPT_MARKER: &str = "⚠️ 字幕なし";

/// Prefix of the marker written when summarization failed
pub const SUMMARY_ERROR_PREFIX: &str = "❌ GPTエラー: ";

/// What happened to a single row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Result column already held text; nothing was written
    Skipped,
    UrlError,
    NoTranscript,
    Summarized(String),
    /// Summarization failed with the given message
    SummaryError(String),
}

impl RowOutcome {
    /// Text written to the result column, if any
    pub fn cell_value(&self) -> Option<String> {
        match self {
            RowOutcome::Skipped => None,
            RowOutcome::UrlError => Some(URL_ERROR_MARKER.to_string()),
            RowOutcome::NoTranscript => Some(NO_TRANSCRIPT_MARKER.to_string()),
            RowOutcome::Summarized(summary) => Some(summary.clone()),
            RowOutcome::SummaryError(message) => Some(format!("{}{}", SUMMARY_ERROR_PREFIX, message)),
        }
    }
}

/// Per-outcome counts for one pass over the sheet
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub skipped: usize,
    pub url_errors: usize,
    pub no_transcript: usize,
    pub summarized: usize,
    pub summary_errors: usize,
}

impl RunReport {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            skipped: 0,
            url_errors: 0,
            no_transcript: 0,
            summarized: 0,
            summary_errors: 0,
        }
    }

    fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Skipped => self.skipped += 1,
            RowOutcome::UrlError => self.url_errors += 1,
            RowOutcome::NoTranscript => self.no_transcript += 1,
            RowOutcome::Summarized(_) => self.summarized += 1,
            RowOutcome::SummaryError(_) => self.summary_errors += 1,
        }
    }

    /// Data rows visited
    pub fn total(&self) -> usize {
        self.skipped + self.url_errors + self.no_transcript + self.summarized + self.summary_errors
    }

    /// Rows that received a write
    pub fn written(&self) -> usize {
        self.total() - self.skipped
    }
}

/// Drives the parse, fetch, summarize and write steps for every data row
pub struct RowProcessor {
    store: Box<dyn RowStore>,
    fetcher: TranscriptFetcher,
    summarizer: Summarizer,
    reporter: ConsoleReporter,
    url_column: usize,
    result_column: usize,
    row_delay: Duration,
}

impl RowProcessor {
    pub fn new(
        store: Box<dyn RowStore>,
        fetcher: TranscriptFetcher,
        summarizer: Summarizer,
        reporter: ConsoleReporter,
        sheet: &SheetConfig,
        row_delay: Duration,
    ) -> Self {
        Self {
            store,
            fetcher,
            summarizer,
            reporter,
            url_column: sheet.url_column,
            result_column: sheet.result_column,
            row_delay,
        }
    }

    pub fn from_config(
        store: Box<dyn RowStore>,
        fetcher: TranscriptFetcher,
        summarizer: Summarizer,
        reporter: ConsoleReporter,
        config: &Config,
    ) -> Self {
        Self::new(
            store,
            fetcher,
            summarizer,
            reporter,
            &config.sheet,
            config.processing.row_delay(),
        )
    }

    /// Read the whole sheet and process every data row in order
    pub async fn run(&self) -> Result<RunReport> {
        let rows = self.store.get_all_values().await?;
        self.reporter.sheet_loaded(&rows);
        self.process_rows(&rows).await
    }

    /// Process already-fetched rows; row 0 is the header and is never touched
    pub async fn process_rows(&self, rows: &[Vec<String>]) -> Result<RunReport> {
        let mut report = RunReport::new();

        for (index, row) in rows.iter().enumerate().skip(1) {
            let outcome = self.process_row(index, row).await?;
            report.record(&outcome);

            if outcome != RowOutcome::Skipped {
                sleep(self.row_delay).await;
            }
        }

        report.finished_at = Utc::now();
        tracing::info!(
            total = report.total(),
            written = report.written(),
            skipped = report.skipped,
            "Finished processing sheet"
        );

        Ok(report)
    }

    /// Run one row through the pipeline and write its result cell
    ///
    /// `index` is the zero-based position in the sheet, so the sheet row is `index + 1`.
    /// Only a failed cell write is returned as an error.
    pub async fn process_row(&self, index: usize, row: &[String]) -> Result<RowOutcome> {
        let sheet_row = index + 1;
        let url = cell(row, self.url_column);
        self.reporter.row_started(sheet_row, url);

        if !cell(row, self.result_column).trim().is_empty() {
            tracing::debug!(row = sheet_row, "Result already present, skipping");
            self.reporter.skipped();
            return Ok(RowOutcome::Skipped);
        }

        let outcome = self.evaluate(sheet_row, url).await;

        if let Some(value) = outcome.cell_value() {
            self.store
                .update_cell(sheet_row, self.result_column + 1, &value)
                .await?;
        }

        Ok(outcome)
    }

    async fn evaluate(&self, sheet_row: usize, url: &str) -> RowOutcome {
        let Some(video_id) = extract_video_id(url) else {
            tracing::warn!(row = sheet_row, url, "No video id in URL");
            self.reporter.url_error();
            return RowOutcome::UrlError;
        };

        // A caption track with no text is as good as none
        let transcript = self.fetcher.fetch(&video_id).await;
        let Some(transcript) = transcript.filter(|text| !text.trim().is_empty()) else {
            self.reporter.no_transcript();
            return RowOutcome::NoTranscript;
        };

        let spinner = self.reporter.spinner("Summarizing...");
        let result = self.summarizer.summarize(&transcript).await;
        spinner.finish_and_clear();

        match result {
            Ok(summary) => {
                tracing::info!(row = sheet_row, video_id = %video_id, "Summary ready");
                self.reporter.summarized(&summary);
                RowOutcome::Summarized(summary)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!(row = sheet_row, video_id = %video_id, "Summarization failed: {}", message);
                self.reporter.summary_failed(&message);
                RowOutcome::SummaryError(message)
            }
        }
    }
}

fn cell(row: &[String], column: usize) -> &str {
    row.get(column).map(String::as_str).unwrap_or("")
}
