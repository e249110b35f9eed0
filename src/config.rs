use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5001/upload";
pub const DEFAULT_FIELD_NAME: &str = "video";
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200?text=Ad+Preview";
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const ENV_ENDPOINT: &str = "VIDEO_AD_SEGMENTS_ENDPOINT";
pub const ENV_TIMEOUT_SECS: &str = "VIDEO_AD_SEGMENTS_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "VIDEO_AD_SEGMENTS_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse config {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Invalid endpoint '{0}': expected an http(s) URL")]
    InvalidEndpoint(String),

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Upload endpoint of the processing backend
    pub endpoint: String,
    /// Multipart field carrying the file
    pub field_name: String,
    /// Whole-request timeout, 0 disables it
    pub timeout_secs: u64,
    pub chunk_size: usize,
    /// Shown when a preview frame or ad image fails to load
    pub placeholder_image_url: String,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            field_name: DEFAULT_FIELD_NAME.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            placeholder_image_url: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults, then the JSON file (if any), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        normalize_config(&mut config);
        config.endpoint_url()?;
        Ok(config)
    }

    /// A missing file yields the defaults; a broken one is an error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str::<ClientConfig>(&raw).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring {}={}: not a number", ENV_TIMEOUT_SECS, raw),
            }
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
    }

    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(self.endpoint.trim())
            .map_err(|_| ConfigError::InvalidEndpoint(self.endpoint.clone()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::InvalidEndpoint(self.endpoint.clone())),
        }
    }
}

pub fn normalize_config(config: &mut ClientConfig) {
    config.endpoint = config.endpoint.trim().to_string();
    config.field_name = non_empty_or(&config.field_name, DEFAULT_FIELD_NAME);
    config.placeholder_image_url =
        non_empty_or(&config.placeholder_image_url, DEFAULT_PLACEHOLDER_IMAGE);
    config.log_level = non_empty_or(&config.log_level, DEFAULT_LOG_LEVEL);
    if config.chunk_size == 0 {
        config.chunk_size = DEFAULT_CHUNK_SIZE;
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
