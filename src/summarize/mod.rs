use async_trait::async_trait;

pub mod openai;

pub use openai::{OpenAiClient, OpenAiError};

use crate::config::SummaryConfig;
use crate::Result;

const PROMPT_INSTRUCTION: &str = "次に示すのはYouTube動画の字幕の内容です。動画の最初から話されていると想定して、文頭が切れないよう自然な日本語で要約してください。";

/// Chat-completion backend used to produce summaries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// Send a single user-role message and return the model's reply
    async fn complete(&self, model: &str, prompt: &str) -> Result<String>;
}

/// Cut `text` to at most `max_chars` characters, then back to the last period
///
/// The period itself is dropped along with anything after it. A prefix with no
/// period is returned whole.
pub fn truncate_text(text: &str, max_chars: usize) -> &str {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text;
    };

    let prefix = &text[..cut];
    let trimmed = prefix.rfind('.').map_or(prefix, |pos| &prefix[..pos]);

    tracing::warn!(
        original_chars = text.chars().count(),
        kept_chars = trimmed.chars().count(),
        "Transcript too long, truncated to {} characters",
        max_chars
    );

    trimmed
}

/// Wrap transcript text in the summarization instruction
pub fn build_prompt(text: &str) -> String {
    format!("{}\n\n{}", PROMPT_INSTRUCTION, text)
}

/// Unify line endings to `\n`, then collapse paragraph breaks to single newlines
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace("\n\n", "\n")
}

/// Truncates, prompts and normalizes around a [`SummaryBackend`]
pub struct Summarizer {
    backend: Box<dyn SummaryBackend>,
    model: String,
    max_chars: usize,
}

impl Summarizer {
    pub fn new(backend: Box<dyn SummaryBackend>, model: impl Into<String>, max_chars: usize) -> Self {
        Self {
            backend,
            model: model.into(),
            max_chars,
        }
    }

    pub fn from_config(backend: Box<dyn SummaryBackend>, config: &SummaryConfig) -> Self {
        Self::new(backend, config.model.clone(), config.max_chars)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Summarize a transcript. Backend failures are returned as-is and never retried.
    pub async fn summarize(&self, transcript: &str) -> Result<String> {
        let text = truncate_text(transcript, self.max_chars);
        let prompt = build_prompt(text);

        tracing::debug!(model = %self.model, prompt_chars = prompt.chars().count(), "Requesting summary");

        let raw = self.backend.complete(&self.model, &prompt).await?;
        Ok(normalize_line_breaks(&raw))
    }
}
