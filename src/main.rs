use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yt_sheet_summarizer::config::{Config, Credentials};
use yt_sheet_summarizer::output::ConsoleReporter;
use yt_sheet_summarizer::processor::RowProcessor;
use yt_sheet_summarizer::sheets::{GoogleSheetsClient, ServiceAccountTokens};
use yt_sheet_summarizer::summarize::{OpenAiClient, Summarizer};
use yt_sheet_summarizer::youtube::{TranscriptFetcher, YoutubeTranscriptProvider};
use yt_sheet_summarizer::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is fine; credentials may come from the real environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load(cli.config.as_deref(), cli.spreadsheet)?;

    let credentials = Credentials::from_env()?;
    let reporter = ConsoleReporter::new(cli.quiet);
    if !cli.quiet {
        config.display();
    }

    let tokens = Arc::new(ServiceAccountTokens::from_file(&credentials.google_credential_path)?);
    let sheet = GoogleSheetsClient::open_by_name(tokens, &config.sheet.name).await?;

    let fetcher = TranscriptFetcher::from_config(
        Box::new(YoutubeTranscriptProvider::new()?),
        &config.transcript,
    );
    let summarizer = Summarizer::from_config(
        Box::new(OpenAiClient::new(
            credentials.openai_api_key.clone(),
            &config.summary.api_base,
        )?),
        &config.summary,
    );

    tracing::info!(
        model = summarizer.model(),
        "Starting run against spreadsheet: {}",
        config.sheet.name
    );

    let processor = RowProcessor::from_config(Box::new(sheet), fetcher, summarizer, reporter, &config);
    let report = processor.run().await?;
    reporter.finished(&report);

    Ok(())
}
