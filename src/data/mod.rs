//! Survey data loading
//!
//! This module reads the Findex microdata into an immutable [`Dataset`]
//! and keeps a modification-time keyed cache for interactive sessions.

pub mod cache;
pub mod loader;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::core::types::SurveyRecord;
use crate::report::quality::DataQuality;

// Re-export commonly used items
pub use cache::DatasetCache;
pub use loader::{CsvLoader, Encoding, LoadOptions, SurveySource};

/// The loaded survey file.
///
/// Records are never mutated once loaded; aggregation always works on
/// borrowed slices of them.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<SurveyRecord>,
    source: PathBuf,
    modified: Option<SystemTime>,
    quality: DataQuality,
}

impl Dataset {
    /// Wrap already-parsed records, scanning them for unexpected codes.
    pub fn new(records: Vec<SurveyRecord>, source: PathBuf, modified: Option<SystemTime>) -> Self {
        let quality = DataQuality::scan(&records);
        Self {
            records,
            source,
            modified,
            quality,
        }
    }

    /// Build an in-memory dataset with no backing file.
    pub fn from_records(records: Vec<SurveyRecord>) -> Self {
        Self::new(records, PathBuf::new(), None)
    }

    pub fn records(&self) -> &[SurveyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    pub fn quality(&self) -> &DataQuality {
        &self.quality
    }
}
