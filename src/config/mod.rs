use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::SheetSummarizerError;

/// Environment variable holding the service-account key file path
pub const GOOGLE_CREDENTIAL_ENV: &str = "GOOGLE_CREDENTIAL_PATH";

/// Environment variable holding the OpenAI API key
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spreadsheet settings
    pub sheet: SheetConfig,

    /// Transcript retrieval settings
    pub transcript: TranscriptConfig,

    /// Summarization settings
    pub summary: SummaryConfig,

    /// Row loop settings
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Spreadsheet name, looked up through Google Drive
    pub name: String,

    /// Zero-based column holding the video URL
    pub url_column: usize,

    /// Zero-based column receiving the summary or error marker
    pub result_column: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Caption languages in order of preference
    pub languages: Vec<String>,

    /// Maximum fetch attempts per video
    pub retries: u32,

    /// Seconds to wait between attempts
    pub retry_delay_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Chat completions model
    pub model: String,

    /// Transcript character budget sent to the model
    pub max_chars: usize,

    /// OpenAI-compatible API base URL
    pub api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Seconds to pause after every row that was not skipped
    pub row_delay_secs: u64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            name: "youtubeURLリスト".to_string(),
            url_column: 2,
            result_column: 3,
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            languages: vec!["ja".to_string(), "en".to_string()],
            retries: 3,
            retry_delay_secs: 2,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-nano".to_string(),
            max_chars: 6000,
            api_base: "https://api.openai.com/v1".to_string(),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { row_delay_secs: 3 }
    }
}

impl TranscriptConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

impl ProcessingConfig {
    pub fn row_delay(&self) -> Duration {
        Duration::from_secs(self.row_delay_secs)
    }
}

impl Config {
    /// Load configuration from an explicit path, the default locations, or defaults
    ///
    /// A spreadsheet name given on the command line replaces the configured one
    /// before validation.
    pub fn load(explicit: Option<&Path>, spreadsheet: Option<String>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file does not exist: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => Self::default_path().filter(|path| path.exists()),
        };

        let mut config = match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                tracing::debug!("No configuration file found, using defaults");
                Self::default()
            }
        };

        if let Some(name) = spreadsheet {
            config.sheet.name = name;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        serde_yaml::from_str(&content).context("Failed to parse config file")
    }

    /// Get configuration file path
    fn default_path() -> Option<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir().map(|dir| dir.join("yt-sheet-summarizer").join("config.yaml"))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| SheetSummarizerError::InvalidConfig(msg.to_string());

        if self.sheet.name.trim().is_empty() {
            return Err(invalid("sheet.name must not be empty").into());
        }

        if self.sheet.url_column == self.sheet.result_column {
            return Err(invalid("sheet.url_column and sheet.result_column must differ").into());
        }

        if self.transcript.retries == 0 {
            return Err(invalid("transcript.retries must be at least 1").into());
        }

        if self.transcript.languages.is_empty() {
            return Err(invalid("transcript.languages must list at least one language").into());
        }

        if self.summary.max_chars == 0 {
            return Err(invalid("summary.max_chars must be greater than zero").into());
        }

        let api_base = Url::parse(&self.summary.api_base)
            .map_err(|_| invalid("summary.api_base is not a valid URL"))?;
        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(invalid("summary.api_base must use HTTP or HTTPS").into());
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Configuration:");
        println!("  Spreadsheet: {}", self.sheet.name);
        println!(
            "  URL column: {}  Result column: {}",
            crate::utils::column_letter(self.sheet.url_column),
            crate::utils::column_letter(self.sheet.result_column)
        );
        println!("  Model: {}", self.summary.model);
    }
}

/// Secrets taken from the process environment
#[derive(Clone)]
pub struct Credentials {
    /// Path to the Google service-account JSON key
    pub google_credential_path: PathBuf,

    /// OpenAI API key
    pub openai_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("google_credential_path", &self.google_credential_path)
            .field("openai_api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read both credentials from the environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| SheetSummarizerError::MissingCredential(key.to_string()))
        };

        Ok(Self {
            google_credential_path: PathBuf::from(require(GOOGLE_CREDENTIAL_ENV)?),
            openai_api_key: require(OPENAI_API_KEY_ENV)?,
        })
    }
}
