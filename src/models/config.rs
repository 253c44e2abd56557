//! Application configuration structures.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Upstream catalog and availability feed
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Poll loop cadence and bootstrap retries
    #[serde(default)]
    pub poller: PollerConfig,

    /// Chat API settings (credentials come from the environment)
    #[serde(default)]
    pub notifier: NotifierConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        Url::parse(&self.sources.catalog_url)?;
        Url::parse(&self.sources.availability_url)?;
        Url::parse(&self.notifier.api_base)?;
        if self.sources.region.trim().is_empty() {
            return Err(AppError::validation("sources.region is empty"));
        }
        if self.poller.interval_secs == 0 {
            return Err(AppError::validation("poller.interval_secs must be > 0"));
        }
        if self.poller.jitter_secs >= self.poller.interval_secs {
            return Err(AppError::validation(
                "poller.jitter_secs must be smaller than poller.interval_secs",
            ));
        }
        if self.poller.bootstrap_attempts == 0 {
            return Err(AppError::validation("poller.bootstrap_attempts must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Upstream endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// HTML server listing
    #[serde(default = "defaults::catalog_url")]
    pub catalog_url: String,

    /// JSON availability feed
    #[serde(default = "defaults::availability_url")]
    pub availability_url: String,

    /// Only feed entries from this region are considered
    #[serde(default = "defaults::region")]
    pub region: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            catalog_url: defaults::catalog_url(),
            availability_url: defaults::availability_url(),
            region: defaults::region(),
        }
    }
}

/// Poll loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Base delay between two cycles
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Maximum random offset added to or removed from the base delay
    #[serde(default = "defaults::jitter")]
    pub jitter_secs: u64,

    /// Attempts made to build the first snapshot before giving up
    #[serde(default = "defaults::bootstrap_attempts")]
    pub bootstrap_attempts: u32,

    /// Delay before the second bootstrap attempt, doubled afterwards
    #[serde(default = "defaults::bootstrap_backoff")]
    pub bootstrap_backoff_secs: u64,
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn bootstrap_backoff(&self) -> Duration {
        Duration::from_secs(self.bootstrap_backoff_secs)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            jitter_secs: defaults::jitter(),
            bootstrap_attempts: defaults::bootstrap_attempts(),
            bootstrap_backoff_secs: defaults::bootstrap_backoff(),
        }
    }
}

/// Chat API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Base URL of the bot API
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Formatting mode passed along with every message
    #[serde(default = "defaults::parse_mode")]
    pub parse_mode: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::api_base(),
            parse_mode: defaults::parse_mode(),
        }
    }
}

/// Chat credentials read from the process environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_token: String,
    pub chat_id: String,
}

impl Credentials {
    pub const TOKEN_VAR: &'static str = "API_TOKEN";
    pub const CHAT_VAR: &'static str = "CHAT_ID";

    /// Read credentials; `None` unless both variables are set and non-empty.
    pub fn from_env() -> Option<Self> {
        Self::from_values(env::var(Self::TOKEN_VAR).ok(), env::var(Self::CHAT_VAR).ok())
    }

    fn from_values(api_token: Option<String>, chat_id: Option<String>) -> Option<Self> {
        let api_token = api_token.filter(|v| !v.trim().is_empty())?;
        let chat_id = chat_id.filter(|v| !v.trim().is_empty())?;
        Some(Self { api_token, chat_id })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

mod defaults {
    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; kimsufi-watcher/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Source defaults
    pub fn catalog_url() -> String {
        "https://www.kimsufi.com/es/servidores.xml".into()
    }
    pub fn availability_url() -> String {
        "https://www.ovh.com/engine/api/dedicated/server/availabilities?country=es".into()
    }
    pub fn region() -> String {
        "europe".into()
    }

    // Poller defaults
    pub fn interval() -> u64 {
        60
    }
    pub fn jitter() -> u64 {
        5
    }
    pub fn bootstrap_attempts() -> u32 {
        3
    }
    pub fn bootstrap_backoff() -> u64 {
        5
    }

    // Notifier defaults
    pub fn api_base() -> String {
        "https://api.telegram.org".into()
    }
    pub fn parse_mode() -> String {
        "Markdown".into()
    }
}
