//! Folder analysis: sizes, counts, and structure.
//!
//! Walks a tree and reports, per directory, the total size of its direct
//! files, their count, and its direct subfolder count, plus a size-ordered
//! listing of every file. Sizes are converted to a display unit and rounded
//! to two decimals; unreadable sizes count as zero.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Display unit for sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SizeUnit {
    B,
    Kb,
    Mb,
    Gb,
}

impl SizeUnit {
    fn divisor(&self) -> u64 {
        match self {
            Self::B => 1,
            Self::Kb => 1024,
            Self::Mb => 1024 * 1024,
            Self::Gb => 1024 * 1024 * 1024,
        }
    }

    /// Converts bytes to this unit, rounded to two decimals.
    pub fn convert(&self, bytes: u64) -> f64 {
        (bytes as f64 / self.divisor() as f64 * 100.0).round() / 100.0
    }
}

impl std::fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::B => "B",
            Self::Kb => "KB",
            Self::Mb => "MB",
            Self::Gb => "GB",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for SizeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "B" => Ok(Self::B),
            "KB" => Ok(Self::Kb),
            "MB" => Ok(Self::Mb),
            "GB" => Ok(Self::Gb),
            other => Err(format!("unknown size unit '{other}' (expected B, KB, MB or GB)")),
        }
    }
}

/// File listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Per-directory statistics over its direct children.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FolderStats {
    /// Total size of direct files, in the report's unit.
    pub size: f64,
    /// Number of direct files.
    pub files: usize,
    /// Number of direct subfolders.
    pub subfolders: usize,
}

/// Result of a folder analysis.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub unit: SizeUnit,
    /// Total size of every file in the tree, in `unit`.
    pub total_size: f64,
    pub total_files: usize,
    /// Every file with its size in `unit`, sorted by size.
    pub files: Vec<(PathBuf, f64)>,
    /// Per-directory statistics, keyed by path.
    pub folders: BTreeMap<PathBuf, FolderStats>,
}

/// Errors that prevent an analysis from starting.
#[derive(Debug)]
pub enum AnalyzeError {
    InvalidRoot { path: PathBuf },
}

impl std::fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoot { path } => {
                write!(f, "Invalid root {}: not a directory", path.display())
            }
        }
    }
}

impl std::error::Error for AnalyzeError {}

/// Collects size and count statistics for a directory tree.
pub struct FolderAnalyzer {
    root: PathBuf,
    unit: SizeUnit,
    order: SortOrder,
}

impl FolderAnalyzer {
    pub fn new(root: &Path, unit: SizeUnit, order: SortOrder) -> Result<Self, AnalyzeError> {
        if !root.is_dir() {
            return Err(AnalyzeError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
            unit,
            order,
        })
    }

    /// Walks the tree and builds the report. Unreadable entries are skipped;
    /// unreadable sizes count as zero.
    pub fn run(&self) -> AnalysisReport {
        #[derive(Default)]
        struct RawStats {
            bytes: u64,
            files: usize,
            subfolders: usize,
        }

        let mut raw: BTreeMap<PathBuf, RawStats> = BTreeMap::new();
        let mut files: Vec<(PathBuf, u64)> = Vec::new();

        for entry in WalkDir::new(&self.root).into_iter().flatten() {
            let path = entry.path().to_path_buf();
            if entry.file_type().is_dir() {
                raw.entry(path.clone()).or_default();
                if path != self.root
                    && let Some(parent) = path.parent()
                {
                    raw.entry(parent.to_path_buf()).or_default().subfolders += 1;
                }
            } else if entry.file_type().is_file() {
                let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                if let Some(parent) = path.parent() {
                    let stats = raw.entry(parent.to_path_buf()).or_default();
                    stats.bytes += size;
                    stats.files += 1;
                }
                files.push((path, size));
            }
        }

        match self.order {
            SortOrder::Ascending => files.sort_by_key(|(_, size)| *size),
            SortOrder::Descending => files.sort_by(|a, b| b.1.cmp(&a.1)),
        }

        let total_bytes: u64 = files.iter().map(|(_, size)| size).sum();
        let total_files = files.len();

        AnalysisReport {
            unit: self.unit,
            total_size: self.unit.convert(total_bytes),
            total_files,
            files: files
                .into_iter()
                .map(|(path, size)| (path, self.unit.convert(size)))
                .collect(),
            folders: raw
                .into_iter()
                .map(|(path, stats)| {
                    (
                        path,
                        FolderStats {
                            size: self.unit.convert(stats.bytes),
                            files: stats.files,
                            subfolders: stats.subfolders,
                        },
                    )
                })
                .collect(),
        }
    }
}
