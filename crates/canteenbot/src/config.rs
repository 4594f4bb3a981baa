use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::scraper::{DEFAULT_REQUEST_DELAY, DEFAULT_USER_AGENT};
use crate::types::DayConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_BASE_URL: &str = "http://5438cpa251hgt.co.uk";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Invalid config {path}: {source}")]
    Invalid {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Config key '{0}' must not be empty")]
    EmptyKey(&'static str),
    #[error("Config key '{key}' is not an http(s) URL: {value}")]
    NotAUrl { key: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(alias = "dataPath")]
    pub output_dir: PathBuf,
    pub webhook_url: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_delay_secs")]
    pub request_delay_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_delay_secs() -> u64 {
    DEFAULT_REQUEST_DELAY.as_secs()
}

impl Config {
    /// Reads and validates `path`. A relative `outputDir` is resolved against
    /// the directory holding the config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = serde_json::from_str::<Config>(&json)
            .map_err(|source| ConfigError::Invalid {
                path: path.to_path_buf(),
                source,
            })?
            .validate()?;

        if config.output_dir.is_relative()
            && let Some(parent) = path.parent()
        {
            config.output_dir = parent.join(&config.output_dir);
        }

        Ok(config)
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyKey("outputDir"));
        }
        if self.webhook_url.trim().is_empty() {
            return Err(ConfigError::EmptyKey("webhookUrl"));
        }
        for (key, value) in [("webhookUrl", &self.webhook_url), ("baseUrl", &self.base_url)] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ConfigError::NotAUrl {
                    key,
                    value: value.clone(),
                });
            }
        }
        Ok(self)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_secs(self.request_delay_secs)
    }

    pub fn days(&self) -> Vec<DayConfig> {
        DayConfig::week(&self.base_url)
    }
}
