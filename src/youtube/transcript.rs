use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use yt_transcript_rs::api::YouTubeTranscriptApi;

use super::VideoId;
use crate::config::TranscriptConfig;
use crate::Result;

/// Source of caption segments for a video
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Fetch the caption segment texts, trying `languages` in order
    async fn fetch_segments(&self, video_id: &str, languages: &[String]) -> Result<Vec<String>>;
}

/// Caption provider backed by YouTube's public transcript endpoints
pub struct YoutubeTranscriptProvider {
    api: YouTubeTranscriptApi,
}

impl YoutubeTranscriptProvider {
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| anyhow::anyhow!("Failed to create transcript client: {}", e))?;

        Ok(Self { api })
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeTranscriptProvider {
    async fn fetch_segments(&self, video_id: &str, languages: &[String]) -> Result<Vec<String>> {
        let languages: Vec<&str> = languages.iter().map(String::as_str).collect();

        let transcript = self
            .api
            .fetch_transcript(video_id, &languages, false)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        tracing::debug!(
            video_id,
            language = %transcript.language_code,
            snippets = transcript.snippets.len(),
            "Fetched transcript"
        );

        Ok(transcript.snippets.into_iter().map(|s| s.text).collect())
    }
}

/// Transcript retrieval with a bounded, fixed-delay retry loop
pub struct TranscriptFetcher {
    provider: Box<dyn TranscriptProvider>,
    languages: Vec<String>,
    retries: u32,
    delay: Duration,
}

impl TranscriptFetcher {
    pub fn new(
        provider: Box<dyn TranscriptProvider>,
        languages: Vec<String>,
        retries: u32,
        delay: Duration,
    ) -> Self {
        Self {
            provider,
            languages,
            retries,
            delay,
        }
    }

    pub fn from_config(provider: Box<dyn TranscriptProvider>, config: &TranscriptConfig) -> Self {
        Self::new(
            provider,
            config.languages.clone(),
            config.retries,
            config.retry_delay(),
        )
    }

    /// Fetch the full transcript text, or `None` once all `retries` attempts have failed
    pub async fn fetch(&self, video_id: &VideoId) -> Option<String> {
        for attempt in 1..=self.retries {
            match self
                .provider
                .fetch_segments(video_id.as_str(), &self.languages)
                .await
            {
                Ok(segments) => return Some(segments.join(" ")),
                Err(e) => {
                    tracing::warn!(
                        video_id = %video_id,
                        attempt,
                        "Transcript fetch failed: {}",
                        e
                    );

                    if attempt < self.retries {
                        sleep(self.delay).await;
                    }
                }
            }
        }

        tracing::error!(video_id = %video_id, "Giving up on transcript after {} attempts", self.retries);
        None
    }
}
