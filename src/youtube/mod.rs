use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

pub mod transcript;

pub use transcript::{TranscriptFetcher, TranscriptProvider, YoutubeTranscriptProvider};

/// 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn video_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:v=|youtu\.be/)([a-zA-Z0-9_-]{11})").expect("video id pattern is valid")
    })
}

/// Extract the video id from a `v=` query parameter or a `youtu.be/` short link
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    video_id_pattern()
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId(m.as_str().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(url: &str) -> Option<String> {
        extract_video_id(url).map(|v| v.to_string())
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ?t=5").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(id("youtu.be/a_b-c_d-e_f").as_deref(), Some("a_b-c_d-e_f"));
    }

    #[test]
    fn test_longer_token_yields_first_eleven() {
        assert_eq!(id("https://youtu.be/abcdefghijklmnop").as_deref(), Some("abcdefghijk"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(id("not a url"), None);
        assert_eq!(id(""), None);
        assert_eq!(id("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(id("https://www.youtube.com/embed/dQw4w9WgXcQ"), None);
        assert_eq!(id("https://youtu.be/dQw4w9WgX!Q"), None);
    }

    #[test]
    fn test_display_and_as_ref() {
        let video = extract_video_id("https://youtu.be/abcdefghijk").unwrap();
        assert_eq!(video.as_str(), "abcdefghijk");
        assert_eq!(video.as_ref(), "abcdefghijk");
        assert_eq!(format!("{}", video), "abcdefghijk");
    }
}
