use std::path::PathBuf;

use thiserror::Error;

/// Bad paths, flags, or config files. Reported to the operator; the run
/// stops before doing any work.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{role} directory ({}) is not a valid directory", .path.display())]
    NotADirectory { role: &'static str, path: PathBuf },

    #[error("target directory ({}) is not empty; consider setting --overwrite or -o", .path.display())]
    TargetNotEmpty { path: PathBuf },

    #[error("couldn't open config file '{}'", .path.display())]
    MissingConfig { path: PathBuf },

    #[error("invalid config file '{}'", .path.display())]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },

    #[error("couldn't open or create database directory '{}'", .path.display())]
    Database {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("time delay must be a non-negative number of seconds, got {0}")]
    TimeDelay(f64),

    #[error("chapter range {start}..{end} is not within the {available} chapters available")]
    ChapterRange {
        start: usize,
        end: usize,
        available: usize,
    },

    #[error("statistics file '{}' does not hold a JSON object", .path.display())]
    Statistics { path: PathBuf },
}

/// Any failed download. There is no retry; the whole fetch run aborts.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GET {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("GET {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
