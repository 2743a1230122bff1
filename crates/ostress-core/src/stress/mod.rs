//! The driving loop: pick an entry, transfer it, sleep, clean up, repeat.
//!
//! Anything other than `Ok` or `NotFound` from a transfer stops the loop with
//! [`StressError::UnexpectedStatus`]; the stress test fails fast rather than
//! retrying a real storage error forever.

mod picker;
mod workers;

use rand::Rng;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{ConfigError, StressConfig};
use crate::manifest::Manifest;
use crate::transfer::{self, TransferOptions, TransferOutcome, TransferRequest, TransferStatus};
use crate::url_model::{self, UrlError};

pub use picker::Picker;
pub use workers::run_workers;

#[derive(Debug, Error)]
pub enum StressError {
    #[error("HTTP - Transfer Failed: {url}: {outcome}")]
    UnexpectedStatus { url: String, outcome: TransferOutcome },

    #[error("could not remove {}: {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("manifest index {index} out of range ({len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("manifest entry {index} ({entry:?}) has no usable file name")]
    BadEntry { index: usize, entry: String },

    #[error("cannot build URL for manifest entry {index}: {source}")]
    Url {
        index: usize,
        #[source]
        source: UrlError,
    },

    #[error("work directory {}: {source}", .path.display())]
    WorkDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to start worker {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker {0} panicked")]
    WorkerPanicked(usize),
}

/// Bound on a run. `iterations: None` runs until a fatal error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunLimits {
    pub iterations: Option<u64>,
}

impl RunLimits {
    pub fn forever() -> Self {
        Self { iterations: None }
    }

    pub fn iterations(n: u64) -> Self {
        Self {
            iterations: Some(n),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub iterations: u64,
    pub ok: u64,
    pub not_found: u64,
}

impl RunSummary {
    pub fn merge(&mut self, other: RunSummary) {
        self.iterations += other.iterations;
        self.ok += other.ok;
        self.not_found += other.not_found;
    }
}

/// Startup work done once before any iteration: load the manifest, check the
/// configured index range against it, and create the work directory.
pub fn prepare(config: &StressConfig) -> Result<Manifest, ConfigError> {
    let manifest = Manifest::load(&config.manifest_path)?;
    manifest.check_range(&config.data_range())?;
    fs::create_dir_all(&config.work_dir).map_err(|source| ConfigError::Io {
        path: config.work_dir.clone(),
        source,
    })?;
    tracing::info!(
        "stressing {}/{} with entries {}..={} of {}, sleeping {}..={}s, downloading into {}",
        config.object_store_url,
        config.fixture_collection,
        config.data_range_min,
        config.data_range_max,
        manifest.len(),
        config.sleep_range_min,
        config.sleep_range_max,
        config.work_dir.display()
    );
    Ok(manifest)
}

/// One sequential stress actor.
pub struct StressLoop<'a, R> {
    config: &'a StressConfig,
    manifest: &'a Manifest,
    work_dir: PathBuf,
    picker: Picker<R>,
    options: TransferOptions,
}

impl<'a, R: Rng> StressLoop<'a, R> {
    pub fn new(config: &'a StressConfig, manifest: &'a Manifest, picker: Picker<R>) -> Self {
        Self {
            config,
            manifest,
            work_dir: config.work_dir.clone(),
            picker,
            options: config.transfer_options(),
        }
    }

    /// Download into `work_dir` instead of the configured one.
    pub fn with_work_dir(mut self, work_dir: PathBuf) -> Self {
        self.work_dir = work_dir;
        self
    }

    pub fn run(&mut self, limits: RunLimits) -> Result<RunSummary, StressError> {
        let mut summary = RunSummary::default();
        loop {
            if limits.iterations.is_some_and(|max| summary.iterations >= max) {
                return Ok(summary);
            }
            self.iteration(&mut summary)?;
        }
    }

    fn iteration(&mut self, summary: &mut RunSummary) -> Result<(), StressError> {
        let index = self.picker.next_index();
        let sleep = self.picker.next_sleep();

        let entry = self
            .manifest
            .get(index)
            .ok_or(StressError::IndexOutOfRange {
                index,
                len: self.manifest.len(),
            })?;
        let url = url_model::object_url(
            &self.config.object_store_url,
            &self.config.fixture_collection,
            entry,
        )
        .map_err(|source| StressError::Url { index, source })?;
        let name = url_model::local_filename(entry).ok_or_else(|| StressError::BadEntry {
            index,
            entry: entry.to_string(),
        })?;
        let destination = self.work_dir.join(name);

        let outcome = transfer::transfer(
            &TransferRequest::new(url.as_str(), destination.clone()),
            &self.options,
        );
        summary.iterations += 1;

        let status = outcome.status();
        match status {
            TransferStatus::Ok => summary.ok += 1,
            TransferStatus::NotFound => {
                summary.not_found += 1;
                tracing::warn!("not found: {}", url);
            }
            TransferStatus::ServiceUnavailable => {
                tracing::error!("HTTP - Transfer Failed: {}", outcome);
                return Err(StressError::UnexpectedStatus {
                    url: url.to_string(),
                    outcome,
                });
            }
        }

        tracing::debug!("sleeping {}s", sleep.as_secs());
        std::thread::sleep(sleep);

        // A 404 never creates the destination, so there is nothing to delete.
        if status == TransferStatus::Ok {
            remove_download(&destination)?;
        }
        Ok(())
    }
}

fn remove_download(path: &Path) -> Result<(), StressError> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!("{} already gone before cleanup", path.display());
            Ok(())
        }
        Err(source) => Err(StressError::Cleanup {
            path: path.to_path_buf(),
            source,
        }),
    }
}
