//! Configuration types for btc-etl

use serde::Deserialize;
use std::path::PathBuf;

/// Coinbase spot price endpoint
pub const DEFAULT_API_URL: &str = "https://api.coinbase.com/v2/prices/spot?currency=USD";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Price API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    /// Request timeout; reqwest default when absent
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Relational store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://`, `postgresql://` or `sqlite:` connection string
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Abort startup when the connectivity check fails
    #[serde(default)]
    pub fail_fast: bool,
}

/// ETL loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    /// Sleep between cycles, added after each cycle completes
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,
}

/// CPU-time sampler configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SamplerConfig {
    #[serde(default = "default_stat_path")]
    pub stat_path: PathBuf,
    #[serde(default = "default_sample_interval")]
    pub interval_secs: u64,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Prometheus scrape port; 0 disables the exporter
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}
fn default_database_url() -> String {
    "sqlite://btc_etl.db?mode=rwc".to_string()
}
fn default_max_connections() -> u32 {
    5
}
fn default_poll_interval() -> u64 {
    10
}
fn default_stat_path() -> PathBuf {
    PathBuf::from("/proc/stat")
}
fn default_sample_interval() -> u64 {
    60
}
fn default_metrics_port() -> u16 {
    9090
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            fail_fast: false,
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            stat_path: default_stat_path(),
            interval_secs: default_sample_interval(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            metrics_port: default_metrics_port(),
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
