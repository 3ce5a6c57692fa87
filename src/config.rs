//! Configuration for the JBIS scraper.

use serde::{Deserialize, Serialize};

/// HTTP fetch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Minimum gap between requests, in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://www.jbis.or.jp/".to_string()
}

fn default_min_interval_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("keiba-jbis/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            min_interval_ms: default_min_interval_ms(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from defaults, an optional `jbis` config file and
    /// `JBIS_*` environment variables (e.g. `JBIS_FETCH__MIN_INTERVAL_MS`).
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Add config file if exists
            .add_source(config::File::with_name("jbis").required(false))
            .add_source(
                config::Environment::with_prefix("JBIS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
