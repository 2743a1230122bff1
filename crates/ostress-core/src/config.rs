//! Stress-run configuration.
//!
//! Values are resolved once at startup in three layers: built-in defaults, an
//! optional TOML file, then environment variables. The result is an explicit
//! [`StressConfig`] that is passed by reference to everything that needs it.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::fs;
use std::io;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::transfer::TransferOptions;
use crate::url_model;

pub const ENV_OBJECT_STORE_URL: &str = "OBJECT_STORE_URL";
pub const ENV_SLEEP_RANGE_MIN: &str = "SLEEP_RANGE_MIN";
pub const ENV_SLEEP_RANGE_MAX: &str = "SLEEP_RANGE_MAX";
pub const ENV_DATA_RANGE_MIN: &str = "DATA_RANGE_MIN";
pub const ENV_DATA_RANGE_MAX: &str = "DATA_RANGE_MAX";
pub const ENV_MANIFEST_PATH: &str = "MANIFEST_PATH";
pub const ENV_WORK_DIR: &str = "WORK_DIR";
pub const ENV_FIXTURE_COLLECTION: &str = "FIXTURE_COLLECTION";
pub const ENV_EXPECTED_FILE_SIZE: &str = "EXPECTED_FILE_SIZE";
pub const ENV_TRANSFER_TIMEOUT_SECS: &str = "TRANSFER_TIMEOUT_SECS";
pub const ENV_TRANSPORT_RETRIES: &str = "TRANSPORT_RETRIES";

pub const DEFAULT_SLEEP_RANGE_MIN: u64 = 1;
pub const DEFAULT_SLEEP_RANGE_MAX: u64 = 5;
pub const DEFAULT_DATA_RANGE_MIN: usize = 0;
/// The stock manifest lists 24873 files.
pub const DEFAULT_DATA_RANGE_MAX: usize = 24872;
pub const DEFAULT_MANIFEST_PATH: &str = "/test/aster_ged_file_list.txt";
pub const DEFAULT_WORK_DIR: &str = "/mnt/mesos/sandbox";
pub const DEFAULT_FIXTURE_COLLECTION: &str = "AG100.003";
/// Size in bytes of every file in the stock fixture collection.
pub const DEFAULT_EXPECTED_FILE_SIZE: u64 = 44_042_064;
pub const DEFAULT_TRANSFER_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_TRANSPORT_RETRIES: u32 = 3;

/// Startup-time configuration failure. Always fatal before the loop runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("you must specify {0} in the environment")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{what} range is empty: min {min} > max {max}")]
    EmptyRange {
        what: &'static str,
        min: u64,
        max: u64,
    },

    #[error("data range max {max} is outside the manifest ({len} entries)")]
    IndexOutOfManifest { max: usize, len: usize },

    #[error("manifest entry {index} ({entry:?}) cannot be used as a file name")]
    UnusableEntry { index: usize, entry: String },

    #[error("invalid object store URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url_model::UrlError,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Optional settings file (`config.toml`). Every key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub object_store_url: Option<String>,
    pub sleep_range_min: Option<u64>,
    pub sleep_range_max: Option<u64>,
    pub data_range_min: Option<usize>,
    pub data_range_max: Option<usize>,
    pub manifest_path: Option<PathBuf>,
    pub work_dir: Option<PathBuf>,
    pub fixture_collection: Option<String>,
    /// `0` disables the fixed-size check.
    pub expected_file_size: Option<u64>,
    pub transfer_timeout_secs: Option<u64>,
    pub transport_retries: Option<u32>,
}

/// Fully resolved configuration for a stress run.
#[derive(Debug, Clone, PartialEq)]
pub struct StressConfig {
    /// Base URL of the object store, without a trailing slash.
    pub object_store_url: String,
    pub sleep_range_min: u64,
    pub sleep_range_max: u64,
    pub data_range_min: usize,
    pub data_range_max: usize,
    pub manifest_path: PathBuf,
    pub work_dir: PathBuf,
    pub fixture_collection: String,
    pub expected_file_size: Option<u64>,
    pub transfer_timeout: Duration,
    pub transport_retries: u32,
}

impl StressConfig {
    /// Closed range of manifest indices the loop may pick.
    pub fn data_range(&self) -> RangeInclusive<usize> {
        self.data_range_min..=self.data_range_max
    }

    /// Closed range of sleep durations, in whole seconds.
    pub fn sleep_range(&self) -> RangeInclusive<u64> {
        self.sleep_range_min..=self.sleep_range_max
    }

    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            timeout: self.transfer_timeout,
            transport_retries: self.transport_retries,
            expected_size: self.expected_file_size,
            ..TransferOptions::default()
        }
    }
}

/// Default config file location: `$XDG_CONFIG_HOME/ostress/config.toml`, if it exists.
pub fn default_config_path() -> Option<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ostress").ok()?;
    xdg_dirs.find_config_file("config.toml")
}

/// Parse a TOML settings file.
pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&data).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Load configuration from `explicit` (must exist) or the default file (if present),
/// then apply overrides from the process environment.
pub fn load(explicit: Option<&Path>) -> Result<StressConfig, ConfigError> {
    let file = match explicit {
        Some(path) => load_file(path)?,
        None => match default_config_path() {
            Some(path) => {
                tracing::debug!("using config file {}", path.display());
                load_file(&path)?
            }
            None => FileConfig::default(),
        },
    };
    resolve(file, |name| std::env::var(name).ok())
}

/// Merge `file` with values from `lookup` (environment wins) and validate the result.
pub fn resolve<F>(file: FileConfig, lookup: F) -> Result<StressConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let object_store_url = lookup(ENV_OBJECT_STORE_URL)
        .or(file.object_store_url)
        .filter(|s| !s.trim().is_empty())
        .ok_or(ConfigError::Missing(ENV_OBJECT_STORE_URL))?;
    let object_store_url = object_store_url.trim().trim_end_matches('/').to_string();
    url_model::parse_base(&object_store_url).map_err(|source| ConfigError::InvalidUrl {
        url: object_store_url.clone(),
        source,
    })?;

    let sleep_range_min = parsed(
        &lookup,
        ENV_SLEEP_RANGE_MIN,
        file.sleep_range_min,
        DEFAULT_SLEEP_RANGE_MIN,
    )?;
    let sleep_range_max = parsed(
        &lookup,
        ENV_SLEEP_RANGE_MAX,
        file.sleep_range_max,
        DEFAULT_SLEEP_RANGE_MAX,
    )?;
    if sleep_range_min > sleep_range_max {
        return Err(ConfigError::EmptyRange {
            what: "sleep",
            min: sleep_range_min,
            max: sleep_range_max,
        });
    }

    let data_range_min = parsed(
        &lookup,
        ENV_DATA_RANGE_MIN,
        file.data_range_min,
        DEFAULT_DATA_RANGE_MIN,
    )?;
    let data_range_max = parsed(
        &lookup,
        ENV_DATA_RANGE_MAX,
        file.data_range_max,
        DEFAULT_DATA_RANGE_MAX,
    )?;
    if data_range_min > data_range_max {
        return Err(ConfigError::EmptyRange {
            what: "data",
            min: data_range_min as u64,
            max: data_range_max as u64,
        });
    }

    let manifest_path = lookup(ENV_MANIFEST_PATH)
        .map(PathBuf::from)
        .or(file.manifest_path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_PATH));
    let work_dir = lookup(ENV_WORK_DIR)
        .map(PathBuf::from)
        .or(file.work_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_WORK_DIR));

    let fixture_collection = lookup(ENV_FIXTURE_COLLECTION)
        .or(file.fixture_collection)
        .unwrap_or_else(|| DEFAULT_FIXTURE_COLLECTION.to_string());
    let fixture_collection = fixture_collection.trim().trim_matches('/').to_string();
    if fixture_collection.is_empty() {
        return Err(ConfigError::Invalid {
            name: ENV_FIXTURE_COLLECTION,
            value: fixture_collection,
            reason: "must not be empty".to_string(),
        });
    }

    let expected_file_size = parsed(
        &lookup,
        ENV_EXPECTED_FILE_SIZE,
        file.expected_file_size,
        DEFAULT_EXPECTED_FILE_SIZE,
    )?;
    let timeout_secs = parsed(
        &lookup,
        ENV_TRANSFER_TIMEOUT_SECS,
        file.transfer_timeout_secs,
        DEFAULT_TRANSFER_TIMEOUT_SECS,
    )?;
    if timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            name: ENV_TRANSFER_TIMEOUT_SECS,
            value: "0".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let transport_retries = parsed(
        &lookup,
        ENV_TRANSPORT_RETRIES,
        file.transport_retries,
        DEFAULT_TRANSPORT_RETRIES,
    )?;

    Ok(StressConfig {
        object_store_url,
        sleep_range_min,
        sleep_range_max,
        data_range_min,
        data_range_max,
        manifest_path,
        work_dir,
        fixture_collection,
        expected_file_size: (expected_file_size > 0).then_some(expected_file_size),
        transfer_timeout: Duration::from_secs(timeout_secs),
        transport_retries,
    })
}

/// Environment value if set, else the file value, else `default`.
fn parsed<T, F>(lookup: &F, name: &'static str, file: Option<T>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => Ok(value),
            Err(e) => Err(ConfigError::Invalid {
                name,
                value: raw,
                reason: e.to_string(),
            }),
        },
        None => Ok(file.unwrap_or(default)),
    }
}
