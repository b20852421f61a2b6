//! YouTube Sheet Summarizer - A Rust CLI tool for summarizing videos listed in a spreadsheet
//!
//! This library reads video URLs from a Google Sheet, fetches each video's transcript,
//! summarizes it with the OpenAI chat completions API and writes the summary back into
//! the sheet. Rows that already carry a result are skipped, so runs can be resumed.

pub mod cli;
pub mod config;
pub mod output;
pub mod processor;
pub mod sheets;
pub mod summarize;
pub mod utils;
pub mod youtube;

pub use cli::Cli;
pub use config::{Config, Credentials};
pub use output::ConsoleReporter;
pub use processor::{RowOutcome, RowProcessor, RunReport};
pub use sheets::{GoogleSheetsClient, RowStore};
pub use summarize::{SummaryBackend, Summarizer};
pub use youtube::{extract_video_id, TranscriptFetcher, TranscriptProvider, VideoId};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the summarizer
#[derive(thiserror::Error, Debug)]
pub enum SheetSummarizerError {
    #[error("Missing environment variable: {0}")]
    MissingCredential(String),

    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    #[error("Sheets API error: {0}")]
    SheetsApi(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
