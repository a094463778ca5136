use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_DATABASE_PATH: &str = "raw_database";
pub const TABLE_OF_CONTENTS_FILE_NAME: &str = "table_of_contents.html";
/// WordPress flags clients that fetch much faster than this.
pub const DEFAULT_TIME_DELAY_SECS: f64 = 120.0;

pub const USER_AGENTS: &[&str] = &[
    // Chrome
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    // Firefox
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
    // Safari (Mac)
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    // Edge
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36 Edg/123.0.0.0",
];

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// URL of the serial's table of contents page.
    pub table_of_contents: String,
}

impl FetchConfig {
    /// Read a JSON config file; `WI_*` environment variables override it
    /// (e.g. `WI_TABLE_OF_CONTENTS`).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let invalid = |source| ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        };
        Config::builder()
            .add_source(File::from(path).format(FileFormat::Json))
            .add_source(Environment::with_prefix("WI"))
            .build()
            .and_then(|c| c.try_deserialize::<FetchConfig>())
            .map_err(invalid)
    }
}

/// The requested config file, or `fallback` if it is missing.
pub fn resolve_config_path(
    requested: Option<&Path>,
    fallback: &Path,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = requested {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        warn!(
            "Config path '{}' not found. Falling back to '{}'.",
            path.display(),
            fallback.display()
        );
    }
    if fallback.is_file() {
        Ok(fallback.to_path_buf())
    } else {
        Err(ConfigError::MissingConfig {
            path: fallback.to_path_buf(),
        })
    }
}

/// The requested database directory, or `fallback` (created if needed).
pub fn resolve_database_dir(
    requested: Option<&Path>,
    fallback: &Path,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = requested {
        if path.is_dir() {
            return Ok(path.to_path_buf());
        }
        warn!(
            "Database path '{}' not found. Falling back to '{}'.",
            path.display(),
            fallback.display()
        );
    }
    if !fallback.is_dir() {
        info!("Creating database directory '{}'", fallback.display());
        fs::create_dir_all(fallback).map_err(|source| ConfigError::Database {
            path: fallback.to_path_buf(),
            source,
        })?;
    }
    Ok(fallback.to_path_buf())
}
