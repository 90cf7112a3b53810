//! Error types for desktop-list
//!
//! Per-file failures (`ScanError::Open`, `ScanError::Read`) are logged and
//! counted by the dispatcher; they never abort a scan. Everything else is
//! fatal to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the discovery pipeline
#[derive(Error, Debug)]
pub enum ScanError {
    /// Entry file could not be opened
    #[error("open application file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entry file could not be read to the end of its first group
    #[error("read application file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A pipeline thread panicked, results would be incomplete
    #[error("thread '{name}' panicked")]
    ThreadPanicked { name: String },

    /// Concurrency bound of zero
    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    /// Failed to start a pipeline thread
    #[error("spawn {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Whether this error only affects a single file
    pub fn is_per_file(&self) -> bool {
        matches!(self, ScanError::Open { .. } | ScanError::Read { .. })
    }
}

/// Errors raised while assembling the search path and tunables
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set
    #[error("${0} not set")]
    MissingEnv(&'static str),

    /// No usable base directories
    #[error("search path is empty")]
    EmptySearchPath,

    /// Config file unreadable
    #[error("read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML
    #[error("parse config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid value
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, ScanError>;
