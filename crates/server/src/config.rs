//! Startup configuration: where the served root directory lives.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location of the JSON config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/// Errors raised while loading configuration or resolving the root.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The config file is not valid JSON or lacks `directory`.
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// `~` was used but the home directory is unknown.
    #[error("cannot expand `~`: home directory not found")]
    NoHome,
    /// The root path could not be canonicalized.
    #[error("cannot resolve root directory {path}: {source}")]
    Resolve {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The root path exists but is not a directory.
    #[error("root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Contents of the JSON config file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory to serve. May start with `~`.
    pub directory: String,
}

impl Config {
    /// Load the config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The canonical directory all file access is confined to.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root(PathBuf);

impl Root {
    /// Expand `~`, canonicalize, and check the result is a directory.
    pub fn resolve(raw: &str) -> Result<Self, ConfigError> {
        let expanded = expand_home(raw)?;
        let path = expanded
            .canonicalize()
            .map_err(|source| ConfigError::Resolve {
                path: expanded.clone(),
                source,
            })?;
        if !path.is_dir() {
            return Err(ConfigError::NotADirectory(path));
        }
        Ok(Self(path))
    }

    /// The canonical root path.
    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Expand a leading `~` or `~/` to the user's home directory.
pub fn expand_home(raw: &str) -> Result<PathBuf, ConfigError> {
    if raw == "~" {
        return dirs::home_dir().ok_or(ConfigError::NoHome);
    }
    if let Some(rest) = raw.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or(ConfigError::NoHome)?;
        return Ok(home.join(rest));
    }
    Ok(PathBuf::from(raw))
}
