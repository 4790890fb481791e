//! Environment-driven configuration for the external services.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_AI_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_LOOKUP_CONCURRENCY: usize = 4;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Credentials and endpoint for the chat-completions model.
#[derive(Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Credentials and endpoint for the YouTube Data API.
#[derive(Clone, PartialEq, Eq)]
pub struct YouTubeConfig {
    pub base_url: String,
    pub api_key: String,
}

impl fmt::Debug for YouTubeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YouTubeConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// What to do when a single video lookup fails during enrichment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnrichmentPolicy {
    /// Any failed lookup fails the whole generation and nothing is saved.
    #[default]
    AllOrNothing,
    /// A failed lookup leaves that topic without a video.
    BestEffort,
}

impl EnrichmentPolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllOrNothing => "all-or-nothing",
            Self::BestEffort => "best-effort",
        }
    }
}

impl FromStr for EnrichmentPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all-or-nothing" | "strict" => Ok(Self::AllOrNothing),
            "best-effort" | "lenient" => Ok(Self::BestEffort),
            _ => Err(ConfigError::InvalidValue {
                name: "STUDYPATH_ENRICHMENT",
                raw: s.to_string(),
            }),
        }
    }
}

/// Settings for the plan generator, the video finder and enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesConfig {
    pub ai: Option<AiConfig>,
    pub youtube: Option<YouTubeConfig>,
    pub lookup_concurrency: usize,
    pub enrichment: EnrichmentPolicy,
    pub http_timeout: Duration,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            ai: None,
            youtube: None,
            lookup_concurrency: DEFAULT_LOOKUP_CONCURRENCY,
            enrichment: EnrichmentPolicy::default(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl ServicesConfig {
    /// Read the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a numeric or enumerated variable is set to
    /// a value that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a numeric or enumerated variable is set to
    /// a value that cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let ai = non_empty("STUDYPATH_AI_API_KEY")
            .or_else(|| non_empty("GOOGLE_API_KEY"))
            .map(|api_key| AiConfig {
                base_url: non_empty("STUDYPATH_AI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_AI_BASE_URL.into()),
                api_key,
                model: non_empty("STUDYPATH_AI_MODEL").unwrap_or_else(|| DEFAULT_AI_MODEL.into()),
            });

        let youtube = non_empty("STUDYPATH_YOUTUBE_API_KEY").map(|api_key| YouTubeConfig {
            base_url: non_empty("STUDYPATH_YOUTUBE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_YOUTUBE_BASE_URL.into()),
            api_key,
        });

        let lookup_concurrency = match non_empty("STUDYPATH_LOOKUP_CONCURRENCY") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "STUDYPATH_LOOKUP_CONCURRENCY",
                    raw,
                })?,
            None => DEFAULT_LOOKUP_CONCURRENCY,
        };

        let enrichment = match non_empty("STUDYPATH_ENRICHMENT") {
            Some(raw) => raw.parse()?,
            None => EnrichmentPolicy::default(),
        };

        let http_timeout = match non_empty("STUDYPATH_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidValue {
                    name: "STUDYPATH_HTTP_TIMEOUT_SECS",
                    raw,
                })?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            ai,
            youtube,
            lookup_concurrency,
            enrichment,
            http_timeout,
        })
    }
}
