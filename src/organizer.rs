//! In-place classification of a directory's top level.
//!
//! Each regular file directly under the root is classified, either by
//! extension against the ordered rule table or by creation-date bucket when
//! a date mode is configured, then optionally renamed and moved into a category
//! directory created under the same root. When neither rules nor a date
//! mode are configured, every file lands in the default bucket.

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::classifier::{ClassificationRuleSet, DateMode, DateRange, DEFAULT_BUCKET};
use crate::mover::Mover;
use crate::rename::{RenameEngine, RenamePolicy};
use crate::report::{Progress, RunResult, SilentProgress};

/// Errors that prevent an organize run from starting.
#[derive(Debug)]
pub enum OrganizeError {
    /// The target root does not exist or is not a directory.
    InvalidRoot { path: PathBuf },
    /// The rule set or date configuration is unusable.
    InvalidConfiguration { reason: String },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoot { path } => {
                write!(f, "Invalid target root {}: not a directory", path.display())
            }
            Self::InvalidConfiguration { reason } => {
                write!(f, "Invalid configuration: {}", reason)
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Classifies and relocates files within a single root directory.
pub struct Organizer {
    root: PathBuf,
    rules: ClassificationRuleSet,
    engine: RenameEngine,
    date_mode: Option<DateMode>,
    date_range: Option<DateRange>,
}

impl Organizer {
    /// Validates the configuration before any filesystem work happens.
    /// Range mode without a range, or a malformed rule set, rejects the run.
    pub fn new(
        root: &Path,
        rules: ClassificationRuleSet,
        rename_policy: RenamePolicy,
        date_mode: Option<DateMode>,
        date_range: Option<DateRange>,
    ) -> Result<Self, OrganizeError> {
        if !root.is_dir() {
            return Err(OrganizeError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }
        rules
            .validate()
            .map_err(|reason| OrganizeError::InvalidConfiguration { reason })?;
        if date_mode == Some(DateMode::Range) && date_range.is_none() {
            return Err(OrganizeError::InvalidConfiguration {
                reason: "date mode 'range' requires a date range".to_string(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
            rules,
            engine: RenameEngine::new(rename_policy),
            date_mode,
            date_range,
        })
    }

    /// Runs the organization without progress reporting.
    pub fn run(&self) -> RunResult {
        self.run_with_progress(&SilentProgress)
    }

    /// Iterates the top level of the root. Extension rules take precedence
    /// over the date mode; with neither, files go to the default bucket.
    /// Range-mode files outside the interval are left untouched. Per-file
    /// failures are recorded and never abort the run.
    pub fn run_with_progress(&self, progress: &dyn Progress) -> RunResult {
        let started = Instant::now();
        let mut result = RunResult::default();

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                result.record_error(self.root.display().to_string(), e);
                result.elapsed = started.elapsed();
                return result;
            }
        };

        for entry in entries.flatten() {
            match entry.file_type() {
                Ok(file_type) if file_type.is_file() => {}
                _ => continue,
            }
            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy().to_string();

            if let Err(message) = self.organize_file(&path, &file_name, &mut result) {
                result.record_error(&file_name, message);
            }
            progress.file_scanned(&path);
        }

        result.elapsed = started.elapsed();
        result
    }

    fn organize_file(
        &self,
        path: &Path,
        file_name: &str,
        result: &mut RunResult,
    ) -> Result<(), String> {
        let metadata = fs::metadata(path).map_err(|e| e.to_string())?;
        let created = created_at(&metadata);
        result.files_processed += 1;

        let folder = if !self.rules.is_empty() {
            self.rules.classify(&extension_of(file_name))
        } else if let Some(mode) = self.date_mode {
            match mode.bucket(created, self.date_range.as_ref()) {
                Some(label) => label,
                // Outside the configured range: leave the file untouched
                None => return Ok(()),
            }
        } else {
            DEFAULT_BUCKET.to_string()
        };

        let prefix_date = if self.engine.policy().use_creation_date {
            created.date_naive()
        } else {
            Local::now().date_naive()
        };
        let new_name = self.engine.apply(file_name, prefix_date);
        if new_name != file_name {
            result.files_renamed += 1;
        }

        let dest_dir = self.root.join(&folder);
        let final_path =
            Mover::place(path, &dest_dir, &new_name).map_err(|e| e.to_string())?;
        result.files_moved += 1;
        result.moved.push(final_path);
        result.record_destination(&dest_dir);
        Ok(())
    }
}

/// Lowercased extension without the dot; empty when the name has none.
pub(crate) fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Creation timestamp of a file, falling back to the modification time on
/// filesystems that do not record creation times.
pub(crate) fn created_at(metadata: &fs::Metadata) -> DateTime<Local> {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .map(DateTime::from)
        .unwrap_or_else(|_| Local::now())
}
