//! Paging defaults loaded from YAML and environment variables.
//!
//! ```yaml
//! paging:
//!   default_page_size: 25
//!   max_page_size: 500
//!   index_from: 1
//! ```
//!
//! Resolution order (lowest to highest priority):
//! 1. built-in defaults
//! 2. the `paging` section of the YAML document
//! 3. `.env` file (loaded into process environment, never overwriting)
//! 4. `PAGING_DEFAULT_PAGE_SIZE`, `PAGING_MAX_PAGE_SIZE`, `PAGING_INDEX_FROM`

use crate::page::{PageRequest, DEFAULT_INDEX_FROM, DEFAULT_PAGE_SIZE};
use serde::Deserialize;
use std::path::Path;

/// Default upper bound for a requested page size.
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 1000;

const ENV_DEFAULT_PAGE_SIZE: &str = "PAGING_DEFAULT_PAGE_SIZE";
const ENV_MAX_PAGE_SIZE: &str = "PAGING_MAX_PAGE_SIZE";
const ENV_INDEX_FROM: &str = "PAGING_INDEX_FROM";

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O or YAML parsing error occurred while loading config.
    Load(String),
    /// A value was present but unusable.
    Invalid { key: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
            ConfigError::Invalid { key, message } => {
                write!(f, "Invalid config value for '{key}': {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    pub default_page_size: u64,
    pub max_page_size: u64,
    pub index_from: u64,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            index_from: DEFAULT_INDEX_FROM,
        }
    }
}

#[derive(Deserialize, Default)]
struct Document {
    #[serde(default)]
    paging: PagingConfig,
}

impl PagingConfig {
    /// Read the `paging` section of a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let doc: Document =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Load(e.to_string()))?;
        doc.paging.validate()?;
        Ok(doc.paging)
    }

    /// Load from a YAML file, then overlay `.env` and `PAGING_*` variables.
    ///
    /// A missing file is not an error; the defaults are used instead.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|e| ConfigError::Load(e.to_string()))?;
            Self::from_yaml_str(&content)?
        } else {
            tracing::debug!(path = %path.display(), "paging config file not found, using defaults");
            Self::default()
        };

        let _ = dotenvy::dotenv();
        let config = config.apply_env()?;
        tracing::debug!(
            default_page_size = config.default_page_size,
            max_page_size = config.max_page_size,
            index_from = config.index_from,
            "loaded paging config"
        );
        Ok(config)
    }

    /// Override fields from `PAGING_*` environment variables that are set.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Some(v) = env_u64(ENV_DEFAULT_PAGE_SIZE)? {
            self.default_page_size = v;
        }
        if let Some(v) = env_u64(ENV_MAX_PAGE_SIZE)? {
            self.max_page_size = v;
        }
        if let Some(v) = env_u64(ENV_INDEX_FROM)? {
            self.index_from = v;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 {
            return Err(invalid("paging.max_page_size", "must be greater than 0"));
        }
        if self.default_page_size == 0 {
            return Err(invalid("paging.default_page_size", "must be greater than 0"));
        }
        if self.default_page_size > self.max_page_size {
            return Err(invalid(
                "paging.default_page_size",
                format!("must not exceed max_page_size ({})", self.max_page_size),
            ));
        }
        Ok(())
    }

    /// Build a request with the configured origin.
    ///
    /// `None` selects the default page size; larger sizes are clamped to
    /// `max_page_size`.
    pub fn request(&self, page_index: u64, page_size: Option<u64>) -> PageRequest {
        let page_size = page_size
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size);
        PageRequest::new(page_index, page_size).with_index_from(self.index_from)
    }

    /// The request for the first page with the default size.
    pub fn first_page(&self) -> PageRequest {
        self.request(self.index_from, None)
    }
}

fn env_u64(key: &str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: std::num::ParseIntError| invalid(key, e.to_string())),
        Err(_) => Ok(None),
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        message: message.into(),
    }
}
