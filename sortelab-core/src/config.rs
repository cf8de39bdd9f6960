//! Serializable generation request.
//!
//! A request captures everything needed to reproduce a batch: format,
//! strategy, game count and size, anchors, statistics window, and the
//! master seed. Requests load from TOML files or are built in code.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::LotteryFormat;
use crate::strategy::Strategy;

/// Default recent-contest window for hot/cold/mixed statistics.
pub const DEFAULT_WINDOW: usize = 100;

/// Errors from request loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read request file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse request: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    #[error("game size {size} outside the selectable range {min}..={max} for '{format}'")]
    SizeOutOfRange {
        format: String,
        size: usize,
        min: usize,
        max: usize,
    },

    #[error("count must be at least 1")]
    ZeroCount,
}

/// One generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Format key, e.g. `megasena`.
    pub format: String,

    pub strategy: Strategy,

    /// Distinct games to produce.
    #[serde(default = "default_count")]
    pub count: usize,

    /// Numbers per game; omitted means the format's draw size.
    #[serde(default)]
    pub size: Option<usize>,

    /// Raw anchor tokens; invalid entries are dropped at parse time.
    #[serde(default)]
    pub anchors: Vec<String>,

    /// Recent-contest window for windowed strategies.
    #[serde(default = "default_window")]
    pub window: usize,

    /// Master seed; omitted means entropy-seeded.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_count() -> usize {
    1
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

impl GenerationRequest {
    /// A request with defaults: one game at the format's draw size.
    pub fn new(format: &str, strategy: Strategy) -> Self {
        Self {
            format: format.to_string(),
            strategy,
            count: default_count(),
            size: None,
            anchors: Vec::new(),
            window: default_window(),
            seed: None,
        }
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// The effective game size for `format`.
    pub fn resolved_size(&self, format: &LotteryFormat) -> usize {
        self.size.unwrap_or(format.draw_size)
    }

    /// Check the request against the format's rules.
    pub fn validate(&self, format: &LotteryFormat) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::ZeroCount);
        }
        let size = self.resolved_size(format);
        if size < format.min_selectable || size > format.max_selectable {
            return Err(ConfigError::SizeOutOfRange {
                format: format.key.clone(),
                size,
                min: format.min_selectable,
                max: format.max_selectable,
            });
        }
        Ok(())
    }
}
