//! Service Configuration
//!
//! Loaded from a JSON file; every field has a default so an empty object
//! (or no file at all) is a valid configuration.
//!
//! ```json
//! {
//!   "watch_dir": "/var/lib/pipeline/output",
//!   "file_pattern": "clients_*.json",
//!   "poll_interval_ms": 10000,
//!   "initial_delay_ms": 5000,
//!   "http": { "host": "0.0.0.0", "port": 8080 }
//! }
//! ```

mod errors;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::loader::{FilePattern, LoaderConfig};

pub use errors::{ConfigError, ConfigResult};

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Directory the pipeline drops snapshot files into (default: "./snapshots")
    #[serde(default = "default_watch_dir")]
    pub watch_dir: PathBuf,

    /// Snapshot file name glob (default: "clients_*.json")
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,

    /// Delay between polls in milliseconds (default: 10000)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Delay before the first scheduled poll in milliseconds (default: 5000)
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// HTTP listener settings
    #[serde(default)]
    pub http: ListenerConfig,
}

/// Where the HTTP transport binds and which browser origins it admits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface address (default: "0.0.0.0")
    pub host: String,
    /// TCP port (default: 8080)
    pub port: u16,
    /// Origins allowed by CORS; empty admits any origin
    pub cors_origins: Vec<String>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: Vec::new(),
        }
    }
}

impl ListenerConfig {
    /// `host:port` as handed to the TCP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_watch_dir() -> PathBuf {
    PathBuf::from("./snapshots")
}

fn default_file_pattern() -> String {
    "clients_*.json".to_string()
}

fn default_poll_interval_ms() -> u64 {
    10_000
}

fn default_initial_delay_ms() -> u64 {
    5_000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            watch_dir: default_watch_dir(),
            file_pattern: default_file_pattern(),
            poll_interval_ms: default_poll_interval_ms(),
            initial_delay_ms: default_initial_delay_ms(),
            http: ListenerConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load and validate configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ServiceConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be > 0".into()));
        }
        if self.http.host.trim().is_empty() {
            return Err(ConfigError::Invalid("http.host must not be empty".into()));
        }

        FilePattern::new(&self.file_pattern)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Derive the snapshot loader settings
    pub fn loader_config(&self) -> ConfigResult<LoaderConfig> {
        let pattern = FilePattern::new(&self.file_pattern)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        Ok(LoaderConfig {
            watch_dir: self.watch_dir.clone(),
            pattern,
            poll_interval: self.poll_interval(),
            initial_delay: self.initial_delay(),
        })
    }
}
