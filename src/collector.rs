//! Collect files by type into a separate destination tree.
//!
//! Walks a source tree recursively, drops files matching the exclusion
//! policy, classifies the rest by extension, and moves matching files into
//! `{dest}/{category}`. Files matching no category are silently skipped.

use glob::Pattern;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

use serde::{Deserialize, Serialize};

use crate::classifier::ClassificationRuleSet;
use crate::mover::Mover;
use crate::organizer::extension_of;
use crate::report::{Progress, RunResult, SilentProgress};

/// Default name prefixes excluded from collection.
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &["~", ".", "$"];

/// Default extensions excluded from collection.
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &["tmp", "log", "sys", "dll", "ini", "lnk"];

/// Files to drop before classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionPolicy {
    /// Filename prefixes to reject (e.g. `~`, `.`, `$`).
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
    /// Lowercase extensions to reject.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Glob patterns matched against the path relative to the source root.
    #[serde(default)]
    pub patterns: Vec<String>,
}

fn default_prefixes() -> Vec<String> {
    DEFAULT_EXCLUDED_PREFIXES
        .iter()
        .map(|p| p.to_string())
        .collect()
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXCLUDED_EXTENSIONS
        .iter()
        .map(|e| e.to_string())
        .collect()
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
            extensions: default_extensions(),
            patterns: Vec::new(),
        }
    }
}

impl ExclusionPolicy {
    /// Pre-compiles the policy so matching never reparses patterns.
    pub fn compile(&self) -> Result<CompiledExclusions, CollectError> {
        let patterns = self
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| CollectError::InvalidPattern {
                    pattern: pattern.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledExclusions {
            prefixes: self.prefixes.clone(),
            extensions: self.extensions.iter().map(|e| e.to_lowercase()).collect(),
            patterns,
        })
    }
}

/// Compiled form of [`ExclusionPolicy`].
pub struct CompiledExclusions {
    prefixes: Vec<String>,
    extensions: HashSet<String>,
    patterns: Vec<Pattern>,
}

impl CompiledExclusions {
    fn excludes(&self, file_name: &str, ext: &str, relative: &Path) -> bool {
        self.prefixes.iter().any(|p| file_name.starts_with(p))
            || self.extensions.contains(ext)
            || self.patterns.iter().any(|p| p.matches_path(relative))
    }
}

/// Errors that prevent a collection run from starting.
#[derive(Debug)]
pub enum CollectError {
    /// The source tree does not exist or is not a directory.
    InvalidSource { path: PathBuf },
    /// The destination root could not be created.
    DestinationSetupFailed { path: PathBuf, source: io::Error },
    /// An exclusion glob pattern failed to compile.
    InvalidPattern { pattern: String },
    /// The rule set is unusable.
    InvalidConfiguration { reason: String },
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSource { path } => {
                write!(f, "Invalid source {}: not a directory", path.display())
            }
            Self::DestinationSetupFailed { path, source } => {
                write!(
                    f,
                    "Failed to create destination {}: {}",
                    path.display(),
                    source
                )
            }
            Self::InvalidPattern { pattern } => {
                write!(f, "Invalid exclusion pattern '{}'", pattern)
            }
            Self::InvalidConfiguration { reason } => {
                write!(f, "Invalid configuration: {}", reason)
            }
        }
    }
}

impl std::error::Error for CollectError {}

/// Moves files by type from a source tree into a destination tree.
pub struct Collector {
    source: PathBuf,
    dest: PathBuf,
    rules: ClassificationRuleSet,
    exclusions: CompiledExclusions,
}

impl Collector {
    /// Validates the source, creates the destination root, and compiles the
    /// exclusion policy. All failures here reject the run before any walk.
    ///
    /// Both roots are canonicalized so a destination nested inside the source
    /// is pruned from the walk no matter how its path is spelled (relative,
    /// absolute, or with `..` components).
    pub fn new(
        source: &Path,
        dest: &Path,
        rules: ClassificationRuleSet,
        exclusions: &ExclusionPolicy,
    ) -> Result<Self, CollectError> {
        if !source.is_dir() {
            return Err(CollectError::InvalidSource {
                path: source.to_path_buf(),
            });
        }
        let source = source
            .canonicalize()
            .map_err(|_| CollectError::InvalidSource {
                path: source.to_path_buf(),
            })?;
        rules
            .validate()
            .map_err(|reason| CollectError::InvalidConfiguration { reason })?;
        fs::create_dir_all(dest).map_err(|e| CollectError::DestinationSetupFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;
        let dest = dest
            .canonicalize()
            .map_err(|e| CollectError::DestinationSetupFailed {
                path: dest.to_path_buf(),
                source: e,
            })?;
        Ok(Self {
            source,
            dest,
            rules,
            exclusions: exclusions.compile()?,
        })
    }

    /// Runs the collection without progress reporting.
    pub fn run(&self) -> RunResult {
        self.run_with_progress(&SilentProgress)
    }

    /// Walks the source tree. Excluded files and files matching no category
    /// are skipped silently; matching files move to `{dest}/{category}`.
    /// When the destination lives inside the source it is pruned from the
    /// walk so collected files are never re-collected. Per-file failures are
    /// recorded and never halt the walk.
    pub fn run_with_progress(&self, progress: &dyn Progress) -> RunResult {
        let started = Instant::now();
        let mut result = RunResult::default();

        let walker = WalkDir::new(&self.source)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.path() != self.dest);

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
            let mut ext = extension_of(&file_name);
            if ext.is_empty() {
                // No extension: sniff the type from leading bytes
                ext = sniff_extension(path).unwrap_or_default();
            }
            let relative = path.strip_prefix(&self.source).unwrap_or(path);

            if self.exclusions.excludes(&file_name, &ext, relative) {
                continue;
            }
            let Some(category) = self.rules.match_extension(&ext) else {
                continue;
            };
            result.files_processed += 1;
            progress.file_scanned(path);

            let dest_dir = self.dest.join(&category);
            match Mover::place(path, &dest_dir, &file_name) {
                Ok(final_path) => {
                    result.files_moved += 1;
                    result.moved.push(final_path);
                    result.record_destination(&dest_dir);
                }
                Err(e) => result.record_error(&file_name, e),
            }
        }

        result.elapsed = started.elapsed();
        result
    }
}

/// Recovers an extension from a file's leading bytes when the name has none.
fn sniff_extension(path: &Path) -> Option<String> {
    let mut file = fs::File::open(path).ok()?;
    let mut buffer = [0u8; 8192];
    let read = file.read(&mut buffer).ok()?;
    infer::get(&buffer[..read]).map(|kind| kind.extension().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::CategoryRule;
    use tempfile::TempDir;

    fn rules() -> ClassificationRuleSet {
        ClassificationRuleSet::new(vec![
            CategoryRule::flat("Images", &["jpg", "png"]),
            CategoryRule::flat("Docs", &["pdf", "txt"]),
        ])
    }

    #[test]
    fn test_new_rejects_missing_source() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = Collector::new(
            Path::new("/no/such/dir"),
            temp_dir.path(),
            rules(),
            &ExclusionPolicy::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_invalid_glob_pattern() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let policy = ExclusionPolicy {
            patterns: vec!["[invalid".to_string()],
            ..Default::default()
        };
        let result = Collector::new(temp_dir.path(), temp_dir.path(), rules(), &policy);
        assert!(matches!(result, Err(CollectError::InvalidPattern { .. })));
    }

    #[test]
    fn test_collects_matching_files_recursively() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        let sub = source.path().join("nested");
        fs::create_dir(&sub).expect("mkdir");
        fs::write(source.path().join("a.png"), "png").expect("write");
        fs::write(sub.join("b.pdf"), "pdf").expect("write");
        fs::write(sub.join("unmatched.xyz"), "xyz").expect("write");

        let collector = Collector::new(
            source.path(),
            dest.path(),
            rules(),
            &ExclusionPolicy::default(),
        )
        .expect("setup");
        let result = collector.run();

        assert_eq!(result.files_moved, 2);
        assert!(dest.path().join("Images").join("a.png").exists());
        assert!(dest.path().join("Docs").join("b.pdf").exists());
        // Unmatched extension: silently left in place
        assert!(sub.join("unmatched.xyz").exists());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_exclusion_defaults_drop_prefixes_and_extensions() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        fs::write(source.path().join("~draft.txt"), "x").expect("write");
        fs::write(source.path().join(".hidden.txt"), "x").expect("write");
        fs::write(source.path().join("$temp.txt"), "x").expect("write");
        fs::write(source.path().join("trace.log"), "x").expect("write");
        fs::write(source.path().join("keep.txt"), "x").expect("write");

        let collector = Collector::new(
            source.path(),
            dest.path(),
            rules(),
            &ExclusionPolicy::default(),
        )
        .expect("setup");
        let result = collector.run();

        assert_eq!(result.files_moved, 1);
        assert!(dest.path().join("Docs").join("keep.txt").exists());
        assert!(source.path().join("~draft.txt").exists());
        assert!(source.path().join("trace.log").exists());
    }

    #[test]
    fn test_glob_patterns_exclude_relative_paths() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        let skip_dir = source.path().join("skipme");
        fs::create_dir(&skip_dir).expect("mkdir");
        fs::write(skip_dir.join("a.txt"), "x").expect("write");
        fs::write(source.path().join("b.txt"), "x").expect("write");

        let policy = ExclusionPolicy {
            patterns: vec!["skipme/**".to_string()],
            ..Default::default()
        };
        let collector = Collector::new(source.path(), dest.path(), rules(), &policy)
            .expect("setup");
        let result = collector.run();

        assert_eq!(result.files_moved, 1);
        assert!(skip_dir.join("a.txt").exists());
        assert!(dest.path().join("Docs").join("b.txt").exists());
    }

    #[test]
    fn test_destination_inside_source_is_not_rescanned() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = source.path().join("collected");
        fs::write(source.path().join("a.txt"), "x").expect("write");

        let collector = Collector::new(
            source.path(),
            &dest,
            rules(),
            &ExclusionPolicy::default(),
        )
        .expect("setup");

        // Two runs: the second must find nothing new to move
        let first = collector.run();
        assert_eq!(first.files_moved, 1);
        let second = collector.run();
        assert_eq!(second.files_moved, 0);
        assert!(dest.join("Docs").join("a.txt").exists());
    }

    #[test]
    fn test_destination_spelled_with_dot_dot_is_still_pruned() {
        let source = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(source.path().join("sub")).expect("mkdir");
        fs::write(source.path().join("a.txt"), "x").expect("write");
        // Same directory as source/collected, spelled through a detour
        let dest = source.path().join("sub").join("..").join("collected");

        let collector = Collector::new(
            source.path(),
            &dest,
            rules(),
            &ExclusionPolicy::default(),
        )
        .expect("setup");
        let result = collector.run();

        // The file must be collected exactly once, not re-collected from
        // the destination later in the same walk
        assert_eq!(result.files_moved, 1);
        let collected = source.path().join("collected").join("Docs");
        assert!(collected.join("a.txt").exists());
        assert!(!collected.join("a_1.txt").exists());
    }

    #[test]
    fn test_name_collisions_in_destination_get_suffixes() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        let sub = source.path().join("sub");
        fs::create_dir(&sub).expect("mkdir");
        fs::write(source.path().join("notes.txt"), "one").expect("write");
        fs::write(sub.join("notes.txt"), "two").expect("write");

        let collector = Collector::new(
            source.path(),
            dest.path(),
            rules(),
            &ExclusionPolicy::default(),
        )
        .expect("setup");
        let result = collector.run();

        assert_eq!(result.files_moved, 2);
        assert!(dest.path().join("Docs").join("notes.txt").exists());
        assert!(dest.path().join("Docs").join("notes_1.txt").exists());
    }
}
