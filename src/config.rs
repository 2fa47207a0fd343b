//! Configuration types for price-tracker
//!
//! Values come from an optional TOML file and are then overridden by the
//! environment (`ITEM_URL`, `BASELINE`, `THRESHOLD`, `SLACK_WEBHOOK`).
//! [`Config::settings`] validates the result into an immutable
//! [`TrackerSettings`] before the scheduler starts.

use crate::telemetry::LogFormat;
use reqwest::Url;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the product page URL
pub const ENV_ITEM_URL: &str = "ITEM_URL";
/// Environment variable holding the baseline price
pub const ENV_BASELINE: &str = "BASELINE";
/// Environment variable holding the alert threshold (percent)
pub const ENV_THRESHOLD: &str = "THRESHOLD";
/// Environment variable holding the webhook endpoint
pub const ENV_WEBHOOK: &str = "SLACK_WEBHOOK";

/// Default CSS selector for the price element
pub const DEFAULT_PRICE_SELECTOR: &str = "span.a-price > span.a-offscreen";

/// Configuration errors, all fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("Baseline must be positive, got {0}")]
    NonPositiveBaseline(Decimal),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tracker: TrackerConfig,
    pub source: SourceConfig,
    pub history: HistoryConfig,
    pub notify: NotifyConfig,
    pub telemetry: TelemetryConfig,
}

/// What to watch and when to alert
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Product page URL
    pub url: Option<String>,
    /// Reference price the deviation is measured against
    pub baseline: Option<Decimal>,
    /// Minimum drop, in percent, that triggers an alert
    pub threshold: Option<Decimal>,
    /// Seconds between cycles
    pub interval_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            url: None,
            baseline: None,
            threshold: None,
            interval_secs: 600, // 10 minutes
        }
    }
}

/// Page rendering backend
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Headless Chromium, runs page scripts
    #[default]
    Chrome,
    /// Plain HTTP GET, no script execution
    Http,
}

/// Page fetching and price extraction
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub renderer: RendererKind,
    /// Chromium executable used by the chrome renderer
    pub chrome_path: String,
    /// CSS selector locating the price text
    pub selector: String,
    /// Upper bound on one page load
    pub timeout_secs: u64,
    /// Virtual time Chromium lets scripts run before dumping the DOM
    pub virtual_time_budget_ms: u64,
    pub user_agent: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            renderer: RendererKind::Chrome,
            chrome_path: "chromium".to_string(),
            selector: DEFAULT_PRICE_SELECTOR.to_string(),
            timeout_secs: 60,
            virtual_time_budget_ms: 5000,
            user_agent: None,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Price history file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: PathBuf,
    /// Prefix a new file with a UTF-8 byte order mark (spreadsheet friendly)
    pub utf8_bom: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("prices.csv"),
            utf8_bom: true,
        }
    }
}

/// Webhook notification
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
    pub currency_symbol: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: 10,
            currency_symbol: "¥".to_string(),
        }
    }
}

impl NotifyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Prometheus exporter port, disabled when unset
    pub metrics_port: Option<u16>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

/// Validated, immutable settings shared by every cycle
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSettings {
    pub url: Url,
    pub baseline: Decimal,
    pub threshold: Decimal,
    pub webhook: Url,
    pub interval: Duration,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise start from defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply overrides from the process environment
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(ENV_ITEM_URL) {
            self.tracker.url = Some(url);
        }
        if let Some(raw) = lookup(ENV_BASELINE) {
            self.tracker.baseline = Some(parse_decimal(ENV_BASELINE, &raw)?);
        }
        if let Some(raw) = lookup(ENV_THRESHOLD) {
            self.tracker.threshold = Some(parse_decimal(ENV_THRESHOLD, &raw)?);
        }
        if let Some(url) = lookup(ENV_WEBHOOK) {
            self.notify.webhook_url = Some(url);
        }
        Ok(self)
    }

    /// Validate the tracker values into immutable settings
    pub fn settings(&self) -> Result<TrackerSettings, ConfigError> {
        let url = parse_url(
            "tracker.url",
            self.tracker.url.as_deref().ok_or(ConfigError::Missing("tracker.url"))?,
        )?;
        let baseline = self
            .tracker
            .baseline
            .ok_or(ConfigError::Missing("tracker.baseline"))?;
        if baseline <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveBaseline(baseline));
        }
        let threshold = self
            .tracker
            .threshold
            .ok_or(ConfigError::Missing("tracker.threshold"))?;
        let webhook = parse_url(
            "notify.webhook_url",
            self.notify
                .webhook_url
                .as_deref()
                .ok_or(ConfigError::Missing("notify.webhook_url"))?,
        )?;
        if self.tracker.interval_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "tracker.interval_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }

        Ok(TrackerSettings {
            url,
            baseline,
            threshold,
            webhook,
            interval: Duration::from_secs(self.tracker.interval_secs),
        })
    }
}

fn parse_decimal(key: &'static str, raw: &str) -> Result<Decimal, ConfigError> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|e| ConfigError::Invalid {
            key,
            reason: format!("{raw:?} is not a decimal number ({e})"),
        })
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
