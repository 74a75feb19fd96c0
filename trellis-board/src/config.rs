//! Store configuration, layered with figment.
//!
//! Precedence (later wins):
//! 1. built-in defaults
//! 2. `trellis.toml` in the working directory, or an explicit file
//! 3. `TRELLIS_ROOT`, `TRELLIS_MIN_GAP`, `TRELLIS_LOCK_TIMEOUT_MS`

use crate::order::{OrderAllocator, DEFAULT_MIN_GAP};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "trellis.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TRELLIS_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {source}")]
    ParseError { source: Box<figment::Error> },

    #[error("Invalid configuration value for key '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError {
            source: Box::new(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Data directory of the file-backed store
    pub root: PathBuf,
    /// Neighbor gap below which moves rebalance the scope
    pub min_gap: f64,
    /// How long a mutation waits for the store lock
    pub lock_timeout_ms: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".trellis"),
            min_gap: DEFAULT_MIN_GAP,
            lock_timeout_ms: 2000,
        }
    }
}

impl BoardConfig {
    /// Load from defaults, `./trellis.toml` and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load with `file` in place of `./trellis.toml`. A missing file is
    /// skipped rather than reported.
    pub fn load_from(file: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(file).extract()?;
        config.validate()?;
        tracing::debug!(?config, "loaded board configuration");
        Ok(config)
    }

    fn figment(file: Option<&Path>) -> Figment {
        let file = file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).only(&["root", "min_gap", "lock_timeout_ms"]))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_gap.is_finite() || self.min_gap < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "min_gap".into(),
                message: format!("must be a finite, non-negative number (got {})", self.min_gap),
            });
        }
        Ok(())
    }

    pub fn allocator(&self) -> OrderAllocator {
        OrderAllocator::new(self.min_gap)
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }
}
