use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sheet-summarizer",
    about = "YouTube Sheet Summarizer - Summarize the videos listed in a Google Sheet",
    version,
    long_about = "Reads YouTube URLs from a Google Sheet, fetches each video's transcript, summarizes it with OpenAI and writes the summary back into the sheet. Rows that already have a summary are skipped, so the tool can be rerun safely. Credentials are read from GOOGLE_CREDENTIAL_PATH and OPENAI_API_KEY (a .env file is honored)."
)]
pub struct Cli {
    /// Configuration file (defaults to ./config.yaml, then the user config directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Spreadsheet name to open (overrides the configuration file)
    #[arg(short, long, value_name = "NAME", env = "SHEET_SUMMARIZER_SPREADSHEET")]
    pub spreadsheet: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Default tracing filter for the selected verbosity
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "yt_sheet_summarizer=debug"
        } else {
            "yt_sheet_summarizer=info"
        }
    }
}
