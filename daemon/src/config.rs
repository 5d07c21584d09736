//! Daemon configuration with TOML file support.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use votedraw_types::Seed;
use votedraw_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for a voting session daemon.
///
/// Can be loaded from a TOML file via [`DaemonConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). CLI flags and `VOTEDRAW_*`
/// environment variables override file values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Choice labels, in display order.
    #[serde(default)]
    pub choices: Vec<String>,

    /// Hex draw seed. A fresh one is generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,

    /// Address the RPC server binds to.
    #[serde(default = "default_rpc_host")]
    pub rpc_host: String,

    /// RPC port.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Token required on `/admin/*` routes. Admin routes are open when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,

    /// Open voting as soon as the server starts.
    #[serde(default = "default_true")]
    pub open_on_start: bool,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_rpc_host() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    7177
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// The configured seed, parsed.
    pub fn parsed_seed(&self) -> Result<Option<Seed>, ConfigError> {
        self.seed
            .as_deref()
            .map(|hex| {
                hex.parse::<Seed>()
                    .map_err(|e| ConfigError::Invalid(format!("seed: {e}")))
            })
            .transpose()
    }

    /// Checks that cannot be expressed in the schema.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.choices.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one choice is required".into(),
            ));
        }
        if let Some(pos) = self.choices.iter().position(|c| c.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("choice {pos} is blank")));
        }
        self.parsed_seed()?;
        Ok(())
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            choices: Vec::new(),
            seed: None,
            rpc_host: default_rpc_host(),
            rpc_port: default_rpc_port(),
            admin_token: None,
            open_on_start: default_true(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
