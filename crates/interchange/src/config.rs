//! Decode options loaded from a TOML config file.
//!
//! # Example
//!
//! ```toml
//! [decode]
//! strategy = "accumulate"
//! max_errors = 20
//! ```
//!
//! Every key is optional; an empty file yields fail-fast decoding.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shapeguard_core::DecodeOptions;

use crate::deserialize::Boundary;

/// Top-level boundary configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// `[decode]` section.
    #[serde(default)]
    pub decode: DecodeOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Read and parse a boundary config TOML file from `path`.
pub fn read_config(path: &Path) -> Result<BoundaryConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: BoundaryConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        strategy = ?config.decode.strategy,
        max_errors = ?config.decode.max_errors,
        "loaded decode options"
    );
    Ok(config)
}

impl Boundary {
    /// Builds a boundary from the `[decode]` section of a config file.
    pub fn from_config_file(path: &Path) -> Result<Self, ConfigError> {
        read_config(path).map(|config| Boundary::new(config.decode))
    }
}
