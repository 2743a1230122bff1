//! Manifest of candidate filenames: one entry per line, loaded once at startup.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::ops::RangeInclusive;
use std::path::Path;

use crate::config::ConfigError;
use crate::url_model;

/// Immutable, position-indexed list of fixture filenames.
///
/// Every line is an entry (trimmed of surrounding whitespace). Blank lines keep
/// their position so configured index ranges keep their meaning; ranges that
/// cover a blank line are rejected by [`Manifest::check_range`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        let manifest = Self::from_reader(BufReader::new(file)).map_err(io_err)?;
        tracing::info!(
            "loaded manifest {} ({} entries)",
            path.display(),
            manifest.len()
        );
        Ok(manifest)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let entries = reader
            .lines()
            .map(|line| line.map(|l| l.trim().to_string()))
            .collect::<io::Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|e| e.as_ref().trim().to_string())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Ensure every index in `range` names an entry that can be downloaded to a local file.
    pub fn check_range(&self, range: &RangeInclusive<usize>) -> Result<(), ConfigError> {
        if *range.end() >= self.entries.len() {
            return Err(ConfigError::IndexOutOfManifest {
                max: *range.end(),
                len: self.entries.len(),
            });
        }
        for index in range.clone() {
            let entry = &self.entries[index];
            if url_model::local_filename(entry).is_none() {
                return Err(ConfigError::UnusableEntry {
                    index,
                    entry: entry.clone(),
                });
            }
        }
        Ok(())
    }
}
