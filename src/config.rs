//! Layered configuration for the dashboard.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file (`--config`)
//! 3. `DASHBOARD_*` environment variables, with `__` separating nested keys
//!    (`DASHBOARD_SOURCE__KIND=http`)
//! 4. Command line flags, applied by the binary
//!
//! ```toml
//! title = "Dooze Metrics"
//! time_horizon = "week"
//! delta_mode = "pct"
//! refresh_secs = 60
//! inverted_metrics = ["support-tickets"]
//!
//! [source]
//! kind = "http"
//! url = "http://localhost:8080"
//!
//! [log]
//! level = "debug"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::data::{DeltaMode, InvertedMetrics, TimeHorizon};
use crate::source::{FileAdapter, MetricsAdapter, MockAdapter};

const ENV_PREFIX: &str = "DASHBOARD";

/// Which adapter serves the dashboard data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Mock,
    File,
    Http,
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(SourceKind::Mock),
            "file" => Ok(SourceKind::File),
            "http" => Ok(SourceKind::Http),
            other => Err(format!("unknown source kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// JSON snapshot for the `file` source.
    pub path: Option<PathBuf>,
    /// Backend base URL for the `http` source.
    pub url: Option<String>,
    /// Seed for the `mock` source.
    pub seed: u64,
    /// Simulated delay for the `mock` source.
    pub latency_ms: u64,
    /// Request timeout for the `http` source.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Mock,
            path: None,
            url: None,
            seed: crate::source::DEFAULT_SEED,
            latency_ms: 100,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub dir: PathBuf,
    pub file: String,
    /// Filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir(),
            file: "metrics-dashboard.log".to_string(),
            level: "info".to_string(),
        }
    }
}

/// Fully resolved dashboard settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    pub product: String,
    pub region: String,
    pub time_horizon: TimeHorizon,
    pub delta_mode: DeltaMode,
    /// Seconds between automatic refetches; 0 disables them.
    pub refresh_secs: u64,
    /// Metric ids where a decrease is good, on top of the built-in ones.
    pub inverted_metrics: Vec<String>,
    pub source: SourceConfig,
    pub log: LogConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Metrics".to_string(),
            product: "dooze".to_string(),
            region: "global".to_string(),
            time_horizon: TimeHorizon::Week,
            delta_mode: DeltaMode::Pct,
            refresh_secs: 60,
            inverted_metrics: Vec::new(),
            source: SourceConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load defaults, the optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            let file = File::from(path).format(FileFormat::Toml).required(true);
            builder = builder.add_source(file);
        }

        let env = env
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("inverted_metrics")
            .try_parsing(true);

        let config = builder
            .add_source(env)
            .build()
            .context("failed to read configuration")?;

        config.try_deserialize().context("invalid configuration")
    }

    /// Parse a TOML document on top of the defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()
            .context("failed to parse configuration")?
            .try_deserialize()
            .context("invalid configuration")
    }

    /// Inverted metric set: built-in ids plus the configured extras.
    pub fn inverted(&self) -> InvertedMetrics {
        InvertedMetrics::new(self.inverted_metrics.iter().cloned())
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_secs > 0).then(|| Duration::from_secs(self.refresh_secs))
    }

    /// Build the adapter selected by `source.kind`.
    pub fn build_adapter(&self) -> Result<Arc<dyn MetricsAdapter>> {
        match self.source.kind {
            SourceKind::Mock => {
                let adapter = MockAdapter::new()
                    .with_seed(self.source.seed)
                    .with_latency(Duration::from_millis(self.source.latency_ms));
                Ok(Arc::new(adapter))
            }
            SourceKind::File => {
                let path = self
                    .source
                    .path
                    .as_ref()
                    .context("source.path is required for the file source")?;
                Ok(Arc::new(FileAdapter::new(path)))
            }
            SourceKind::Http => self.build_http_adapter(),
        }
    }

    #[cfg(feature = "http")]
    fn build_http_adapter(&self) -> Result<Arc<dyn MetricsAdapter>> {
        let url = self
            .source
            .url
            .as_ref()
            .context("source.url is required for the http source")?;
        let adapter = crate::source::HttpAdapter::builder()
            .base_url(url.as_str())
            .timeout(Duration::from_secs(self.source.timeout_secs.max(1)))
            .build()
            .context("failed to create HTTP client")?;
        Ok(Arc::new(adapter))
    }

    #[cfg(not(feature = "http"))]
    fn build_http_adapter(&self) -> Result<Arc<dyn MetricsAdapter>> {
        anyhow::bail!("the http source requires the `http` feature")
    }
}
