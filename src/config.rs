use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default prediction endpoint of the classifier service
pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/predict";

/// Multipart field name the service reads the image from
pub const DEFAULT_IMAGE_FIELD: &str = "image";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema_version: u32,
    pub endpoint_url: String,
    pub image_field: String,

    // Network limits
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: 1,
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
            image_field: DEFAULT_IMAGE_FIELD.to_string(),
            request_timeout_ms: 60_000,
            connect_timeout_ms: 10_000,
        }
    }
}

impl Config {
    /// Get the default config directory
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".tealeafscan"))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from file, or return default when the file is missing
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {:?}", path))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file {:?}", path))
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from the default location, falling back to defaults on any error
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_or_default_at(&path),
            Err(e) => {
                debug!("No config location, using default: {:#}", e);
                Self::default()
            }
        }
    }

    fn load_or_default_at(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            debug!("Failed to load config, using default: {:#}", e);
            Self::default()
        })
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
