//! End-to-end runs of the row processor against in-memory backends.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use yt_sheet_summarizer::config::Config;
use yt_sheet_summarizer::processor::{RowProcessor, NO_TRANSCRIPT_MARKER, URL_ERROR_MARKER};
use yt_sheet_summarizer::{
    ConsoleReporter, Result, RowStore, Summarizer, SummaryBackend, TranscriptFetcher,
    TranscriptProvider,
};

#[derive(Default)]
struct SheetState {
    rows: Mutex<Vec<Vec<String>>>,
    writes: AtomicUsize,
}

struct MemorySheet(Arc<SheetState>);

#[async_trait]
impl RowStore for MemorySheet {
    async fn get_all_values(&self) -> Result<Vec<Vec<String>>> {
        Ok(self.0.rows.lock().unwrap().clone())
    }

    async fn update_cell(&self, row: usize, col: usize, value: &str) -> Result<()> {
        let mut rows = self.0.rows.lock().unwrap();
        let cells = &mut rows[row - 1];
        if cells.len() < col {
            cells.resize(col, String::new());
        }
        cells[col - 1] = value.to_string();
        self.0.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FixedTranscript {
    text: Option<&'static str>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl TranscriptProvider for FixedTranscript {
    async fn fetch_segments(&self, _video_id: &str, _languages: &[String]) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.text {
            Some(text) => Ok(vec![text.to_string()]),
            None => anyhow::bail!("Subtitles are disabled for this video"),
        }
    }
}

struct FixedSummary {
    reply: &'static str,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl SummaryBackend for FixedSummary {
    async fn complete(&self, _model: &str, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.to_string())
    }
}

struct Harness {
    sheet: Arc<SheetState>,
    transcript_calls: Arc<AtomicUsize>,
    summary_calls: Arc<AtomicUsize>,
}

impl Harness {
    fn new(rows: Vec<Vec<&str>>) -> Self {
        let sheet = Arc::new(SheetState::default());
        *sheet.rows.lock().unwrap() = rows
            .into_iter()
            .map(|r| r.into_iter().map(String::from).collect())
            .collect();

        Self {
            sheet,
            transcript_calls: Arc::new(AtomicUsize::new(0)),
            summary_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn processor(&self, transcript: Option<&'static str>, reply: &'static str) -> RowProcessor {
        let config = Config::default();
        let fetcher = TranscriptFetcher::from_config(
            Box::new(FixedTranscript {
                text: transcript,
                calls: Arc::clone(&self.transcript_calls),
            }),
            &config.transcript,
        );
        let summarizer = Summarizer::from_config(
            Box::new(FixedSummary {
                reply,
                calls: Arc::clone(&self.summary_calls),
            }),
            &config.summary,
        );

        RowProcessor::from_config(
            Box::new(MemorySheet(Arc::clone(&self.sheet))),
            fetcher,
            summarizer,
            ConsoleReporter::new(true),
            &config,
        )
    }

    fn result(&self, row: usize) -> String {
        self.sheet.rows.lock().unwrap()[row][3].clone()
    }

    fn writes(&self) -> usize {
        self.sheet.writes.load(Ordering::SeqCst)
    }
}

#[tokio::test(start_paused = true)]
async fn summary_is_written_then_skipped_on_rerun() {
    let harness = Harness::new(vec![
        vec!["No", "Title", "URL", "Summary"],
        vec!["", "", "https://youtu.be/abcdefghijk", ""],
    ]);

    let report = harness
        .processor(Some("Hello world."), "これは要約です。")
        .run()
        .await
        .unwrap();

    assert_eq!(report.summarized, 1);
    assert_eq!(harness.result(1), "これは要約です。");
    assert_eq!(harness.writes(), 1);
    assert_eq!(harness.transcript_calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.summary_calls.load(Ordering::SeqCst), 1);

    let report = harness
        .processor(Some("Hello world."), "これは要約です。")
        .run()
        .await
        .unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.written(), 0);
    assert_eq!(harness.writes(), 1);
    assert_eq!(harness.transcript_calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.summary_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn error_markers_are_idempotent_too() {
    let harness = Harness::new(vec![
        vec!["No", "Title", "URL", "Summary"],
        vec!["1", "", "https://example.com/not-youtube", ""],
        vec!["2", "", "https://www.youtube.com/watch?v=dQw4w9WgXcQ"],
    ]);

    let started = tokio::time::Instant::now();
    let report = harness.processor(None, "unused").run().await.unwrap();

    assert_eq!(report.url_errors, 1);
    assert_eq!(report.no_transcript, 1);
    assert_eq!(harness.result(1), URL_ERROR_MARKER);
    assert_eq!(harness.result(2), NO_TRANSCRIPT_MARKER);
    assert_eq!(harness.transcript_calls.load(Ordering::SeqCst), 3);
    assert_eq!(harness.summary_calls.load(Ordering::SeqCst), 0);
    // Row pauses (3s x 2) plus two retry delays (2s x 2).
    assert_eq!(started.elapsed(), Duration::from_secs(10));

    let report = harness.processor(None, "unused").run().await.unwrap();
    assert_eq!(report.skipped, 2);
    assert_eq!(harness.writes(), 2);
}
