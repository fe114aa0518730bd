//! Content-based duplicate detection.
//!
//! Walks a directory tree, hashes every regular file, and moves every file
//! whose digest has been seen before into a quarantine subtree under the
//! scanned root. The quarantine directory is created up front and pruned
//! from traversal, so repeated runs never re-process quarantined files.
//!
//! Which of two byte-identical files is kept in place depends on walk order;
//! entries are walked sorted by file name, so a given platform behaves
//! deterministically, but the choice is not part of the contract.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

use crate::hasher::ContentHasher;
use crate::mover::Mover;
use crate::report::{Progress, RunResult, SilentProgress};

/// Name of the quarantine directory created under the scanned root.
pub const QUARANTINE_DIR: &str = "duplicates";

/// Errors that prevent a duplicate scan from starting.
#[derive(Debug)]
pub enum ScanError {
    /// The scan root does not exist or is not a directory.
    InvalidRoot { path: PathBuf },
    /// The quarantine directory could not be created.
    QuarantineSetupFailed { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoot { path } => {
                write!(f, "Invalid scan root {}: not a directory", path.display())
            }
            Self::QuarantineSetupFailed { path, source } => {
                write!(
                    f,
                    "Failed to create quarantine directory {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ScanError {}

/// Detects and quarantines content duplicates under a root directory.
pub struct DuplicateDetector {
    root: PathBuf,
    quarantine: PathBuf,
    hasher: ContentHasher,
}

impl DuplicateDetector {
    /// Prepares a scan: validates the root and creates the quarantine
    /// directory up front. Setup failures reject the run before any walk.
    ///
    /// The root is canonicalized so the quarantine prune holds however the
    /// root path is spelled.
    pub fn new(root: &Path) -> Result<Self, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }
        let root = root.canonicalize().map_err(|_| ScanError::InvalidRoot {
            path: root.to_path_buf(),
        })?;
        let quarantine = root.join(QUARANTINE_DIR);
        fs::create_dir_all(&quarantine).map_err(|e| ScanError::QuarantineSetupFailed {
            path: quarantine.clone(),
            source: e,
        })?;
        Ok(Self {
            root,
            quarantine,
            hasher: ContentHasher::new(),
        })
    }

    /// The quarantine directory receiving duplicates.
    pub fn quarantine_dir(&self) -> &Path {
        &self.quarantine
    }

    /// Runs the scan without progress reporting.
    pub fn run(&self) -> RunResult {
        self.run_with_progress(&SilentProgress)
    }

    /// Walks the root, hashing every regular file. The first file seen with
    /// a given digest stays in place; every later file with that digest is
    /// moved into the quarantine directory under a collision-safe name.
    ///
    /// Per-file failures (unreadable file, failed move) are recorded and
    /// never abort the walk. `files_processed` counts successfully hashed
    /// files only.
    pub fn run_with_progress(&self, progress: &dyn Progress) -> RunResult {
        let started = Instant::now();
        let mut result = RunResult::default();
        let mut index: HashMap<String, PathBuf> = HashMap::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.path() != self.quarantine);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let name = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "<unknown>".to_string());
                    result.record_error(name, &e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().to_string();

            let digest = match self.hasher.digest(path) {
                Ok(digest) => digest,
                Err(e) => {
                    result.record_error(&file_name, e);
                    continue;
                }
            };
            result.files_processed += 1;
            progress.file_scanned(path);

            if index.contains_key(&digest) {
                match Mover::place(path, &self.quarantine, &file_name) {
                    Ok(final_path) => {
                        result.duplicate_files += 1;
                        result.files_moved += 1;
                        result.moved.push(final_path);
                        result.record_destination(&self.quarantine);
                    }
                    Err(e) => result.record_error(&file_name, e),
                }
            } else {
                index.insert(digest, path.to_path_buf());
            }
        }

        result.unique_files = index.len();
        result.elapsed = started.elapsed();
        result
    }
}
