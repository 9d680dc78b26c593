use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::debug;

use crate::core::error::Result;
use crate::data::Dataset;
use crate::data::loader::SurveySource;
use crate::reporting::logging::log_data_quality;

/// Keeps the last loaded dataset for as long as its file is unchanged.
///
/// The cache key is the source path plus the file's modification time, so an
/// interactive session re-reads the survey only after it has been replaced.
pub struct DatasetCache<S: SurveySource> {
    source: S,
    entry: Option<CacheEntry>,
    loads: usize,
}

struct CacheEntry {
    path: PathBuf,
    modified: Option<SystemTime>,
    dataset: Dataset,
}

impl<S: SurveySource> DatasetCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entry: None,
            loads: 0,
        }
    }

    /// Return the dataset for `path`, loading it when absent or stale.
    pub fn get(&mut self, path: &Path) -> Result<&Dataset> {
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok();

        let entry = match self.entry.take() {
            Some(entry)
                if entry.path == path && entry.modified.is_some() && entry.modified == modified =>
            {
                debug!("Reusing cached dataset for {}", path.display());
                entry
            }
            _ => {
                debug!("Loading dataset from {}", path.display());
                let dataset = self.source.load(path)?;
                self.loads += 1;
                log_data_quality(dataset.quality());
                CacheEntry {
                    path: path.to_path_buf(),
                    modified: dataset.modified(),
                    dataset,
                }
            }
        };

        Ok(&self.entry.insert(entry).dataset)
    }

    /// Number of times the underlying source has been read.
    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
