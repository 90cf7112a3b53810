use crate::error::ConfigError;
use crate::sources::desktop::parser::Classifier;
use crate::sources::desktop::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};
use directories::{BaseDirs, ProjectDirs};
use log::warn;
use serde::Deserialize;
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

pub const XDG_DATA_DIRS: &str = "XDG_DATA_DIRS";
pub const XDG_DATA_HOME: &str = "XDG_DATA_HOME";

#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub classify: ClassifyConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GeneralConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_workers() -> usize { DEFAULT_WORKERS }
fn default_queue_capacity() -> usize { DEFAULT_QUEUE_CAPACITY }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClassifyConfig {
    #[serde(default = "default_user_prefix")]
    pub user_prefix: String,
    #[serde(default = "default_sandbox_marker")]
    pub sandbox_marker: String,
}

fn default_user_prefix() -> String { Classifier::default().user_prefix }
fn default_sandbox_marker() -> String { Classifier::default().sandbox_marker }

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            user_prefix: default_user_prefix(),
            sandbox_marker: default_sandbox_marker(),
        }
    }
}

impl ClassifyConfig {
    pub fn classifier(&self) -> Classifier {
        Classifier {
            user_prefix: self.user_prefix.clone(),
            sandbox_marker: self.sandbox_marker.clone(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.workers",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.classify.user_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "classify.user_prefix",
                reason: "must not be empty".to_string(),
            });
        }
        if self.classify.sandbox_marker.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "classify.sandbox_marker",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "desktop-list", "desktop-list").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load an explicit config file, or the default one if it exists.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
        path: config_path.clone(),
        source,
    })?;
    let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: config_path.clone(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Split a `:`-separated search path. Empty and relative components are
/// dropped; the XDG base directory convention ignores relative paths.
pub fn parse_search_path(value: &OsStr) -> Vec<PathBuf> {
    env::split_paths(value)
        .filter(|path| {
            if path.as_os_str().is_empty() {
                return false;
            }
            if path.is_relative() {
                warn!("Ignoring relative data directory {:?}", path);
                return false;
            }
            true
        })
        .collect()
}

/// `$XDG_DATA_HOME` if set and absolute, else the platform data dir.
pub fn user_data_dir(xdg_data_home: Option<&OsStr>) -> Option<PathBuf> {
    if let Some(value) = xdg_data_home {
        let path = PathBuf::from(value);
        if path.is_absolute() {
            return Some(path);
        }
    }
    BaseDirs::new().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Build the ranked base directory list.
///
/// `explicit` wins over `from_env` (the value of `$XDG_DATA_DIRS`); with
/// neither available the search path is missing. `data_home`, when given,
/// is placed first.
pub fn resolve_search_path(
    explicit: Option<&OsStr>,
    from_env: Option<&OsStr>,
    data_home: Option<PathBuf>,
) -> Result<Vec<PathBuf>, ConfigError> {
    let value = explicit.or(from_env).ok_or(ConfigError::MissingEnv(XDG_DATA_DIRS))?;

    let mut dirs = Vec::new();
    dirs.extend(data_home);
    dirs.extend(parse_search_path(value));

    if dirs.is_empty() {
        return Err(ConfigError::EmptySearchPath);
    }
    Ok(dirs)
}
