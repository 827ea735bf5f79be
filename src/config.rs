use std::path::PathBuf;

use directories::ProjectDirs;
use reqwest::Url;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_LOG_FILTER: &str = "info";

pub const API_URL_VAR: &str = "PLAYTABS_API_URL";
pub const TOKEN_VAR: &str = "PLAYTABS_TOKEN";
pub const LOG_VAR: &str = "PLAYTABS_LOG";
pub const DATA_DIR_VAR: &str = "PLAYTABS_DATA";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid API url '{value}': {reason}")]
    InvalidApiUrl { value: String, reason: String },

    #[error("Could not determine a data directory, set {DATA_DIR_VAR}")]
    NoDataDir,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub token: Option<String>,
    pub log_filter: String,
    pub data_dir: PathBuf,
}

impl Config {
    /// Reads the process environment. Call `dotenv` first if `.env` should
    /// be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(raw_url.trim_end_matches('/')).map_err(|e| {
            ConfigError::InvalidApiUrl {
                value: raw_url.clone(),
                reason: e.to_string(),
            }
        })?;

        let data_dir = match lookup(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => ProjectDirs::from("dev", "playtabs", "playtabs")
                .map(|dirs| dirs.data_local_dir().to_path_buf())
                .ok_or(ConfigError::NoDataDir)?,
        };

        Ok(Self {
            api_url,
            token: lookup(TOKEN_VAR).filter(|t| !t.is_empty()),
            log_filter: lookup(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            data_dir,
        })
    }
}
