//! Run results and progress reporting.
//!
//! Every mode produces a [`RunResult`] consumed by the presentation layer.
//! The core itself performs no output; during a walk it only emits progress
//! events through the [`Progress`] trait.

use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A per-file failure recorded during a run. These never abort the walk.
#[derive(Debug, Clone, Serialize)]
pub struct FileError {
    /// Name (or path) of the file the failure relates to.
    pub name: String,
    /// Human-readable failure message.
    pub message: String,
}

/// Outcome of a single run, produced once and handed to the reporting layer.
///
/// "Zero files processed" is a valid outcome, distinct from a rejected
/// configuration: a completed run always yields a `RunResult`, even if every
/// file failed.
#[derive(Debug, Default, Serialize)]
pub struct RunResult {
    /// Wall-clock duration of the run.
    #[serde(rename = "elapsed_seconds", serialize_with = "duration_secs")]
    pub elapsed: Duration,
    /// Files successfully examined (hashed or classified).
    pub files_processed: usize,
    /// Distinct content digests seen (duplicate detection only).
    pub unique_files: usize,
    /// Files quarantined as content duplicates (duplicate detection only).
    pub duplicate_files: usize,
    /// Files physically relocated this run.
    pub files_moved: usize,
    /// Files whose name changed during relocation.
    pub files_renamed: usize,
    /// Final paths of relocated files, in move order.
    pub moved: Vec<PathBuf>,
    /// Destination directories that received at least one file.
    pub destinations: Vec<PathBuf>,
    /// Per-file failures in encounter order.
    pub errors: Vec<FileError>,
}

impl RunResult {
    /// Appends a per-file failure.
    pub fn record_error(&mut self, name: impl Into<String>, message: impl ToString) {
        self.errors.push(FileError {
            name: name.into(),
            message: message.to_string(),
        });
    }

    /// Records a destination directory, keeping the list free of repeats.
    pub fn record_destination(&mut self, path: &Path) {
        if !self.destinations.iter().any(|p| p == path) {
            self.destinations.push(path.to_path_buf());
        }
    }

    /// Key/value rows for table display.
    pub fn to_rows(&self) -> Vec<(String, String)> {
        vec![
            (
                "elapsed_seconds".to_string(),
                format!("{:.2}", self.elapsed.as_secs_f64()),
            ),
            (
                "files_processed".to_string(),
                self.files_processed.to_string(),
            ),
            ("unique_files".to_string(), self.unique_files.to_string()),
            (
                "duplicate_files".to_string(),
                self.duplicate_files.to_string(),
            ),
            ("files_moved".to_string(), self.files_moved.to_string()),
            ("files_renamed".to_string(), self.files_renamed.to_string()),
            (
                "destinations".to_string(),
                self.destinations.len().to_string(),
            ),
            ("errors".to_string(), self.errors.len().to_string()),
        ]
    }
}

fn duration_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Receives progress events during a walk.
///
/// Implemented by the presentation layer (e.g. a spinner); the core never
/// prints.
pub trait Progress {
    /// Called after each file has been examined.
    fn file_scanned(&self, _path: &Path) {}
}

/// No-op progress sink.
pub struct SilentProgress;

impl Progress for SilentProgress {}
