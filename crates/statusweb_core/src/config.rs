//! Process configuration read from the environment.
//!
//! # Responsibility
//! - Resolve database path, logging settings and feed page size.
//! - Reject malformed values instead of silently falling back.
//!
//! # Invariants
//! - `page_size` is within `1..=NEWS_PAGE_SIZE_MAX`.
//! - `log_dir`, when present, is an absolute path.

use crate::logging::default_log_level;
use crate::view::news_page::{NEWS_PAGE_SIZE_DEFAULT, NEWS_PAGE_SIZE_MAX};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "LOG_DIR";
pub const NEWS_PAGE_SIZE_ENV: &str = "NEWS_PAGE_SIZE";

pub const DEFAULT_DATABASE_PATH: &str = "tibia.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid {key} `{value}`; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub page_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            log_level: default_log_level().to_string(),
            log_dir: None,
            page_size: NEWS_PAGE_SIZE_DEFAULT,
        }
    }
}

impl AppConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();

        if let Some(path) = read(DATABASE_PATH_ENV) {
            config.database_path = PathBuf::from(path);
        }

        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = level;
        }

        if let Some(dir) = read(LOG_DIR_ENV) {
            let dir = PathBuf::from(&dir);
            if !dir.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: LOG_DIR_ENV,
                    value: dir.display().to_string(),
                    expected: "an absolute path",
                });
            }
            config.log_dir = Some(dir);
        }

        if let Some(raw) = read(NEWS_PAGE_SIZE_ENV) {
            config.page_size = parse_page_size(&raw)?;
        }

        Ok(config)
    }
}

fn parse_page_size(raw: &str) -> Result<u32, ConfigError> {
    match raw.parse::<u32>() {
        Ok(size) if (1..=NEWS_PAGE_SIZE_MAX).contains(&size) => Ok(size),
        _ => Err(ConfigError::InvalidValue {
            key: NEWS_PAGE_SIZE_ENV,
            value: raw.to_string(),
            expected: "an integer between 1 and 50",
        }),
    }
}
