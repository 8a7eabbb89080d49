//! Application settings.
//!
//! Read from an optional TOML file; the CLI overrides individual values
//! from flags and environment variables afterwards.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DocError, DocResult};

/// Default settings file looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "famdoc.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Redis connection URL
    pub redis_url: String,

    /// Public base URL of the web application, used in invitation links
    pub app_url: String,

    pub host: String,
    pub port: u16,

    /// Log file written by `serve --log`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            app_url: "http://localhost:3000".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3030,
            log_file: None,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> DocResult<Self> {
        toml::from_str(text).map_err(|e| DocError::Config(e.to_string()))
    }

    /// Load settings from a file that must exist.
    pub fn load(path: &Path) -> DocResult<Self> {
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded settings file");
        Self::from_toml(&text)
    }

    /// Load the given file, or `famdoc.toml` in `dir` when present, or defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> DocResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_SETTINGS_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
