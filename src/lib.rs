//! ordena - scan, deduplicate, and organize directories
//!
//! This library walks filesystem trees, identifies files by content and by
//! name/metadata, and reorganizes them according to user-selected policy:
//! quarantining content duplicates, classifying by extension category or
//! creation-date bucket, or collecting files by type into a destination
//! tree. Every relocation goes through a collision-safe mover that never
//! overwrites an existing file.

pub mod analyzer;
pub mod classifier;
pub mod cli;
pub mod collector;
pub mod config;
pub mod duplicates;
pub mod hasher;
pub mod mover;
pub mod organizer;
pub mod output;
pub mod rename;
pub mod report;

pub use analyzer::{AnalysisReport, FolderAnalyzer, SizeUnit, SortOrder};
pub use classifier::{CategoryRule, ClassificationRuleSet, DateMode, DateRange};
pub use collector::{CollectError, Collector, ExclusionPolicy};
pub use config::{AppConfig, ConfigError};
pub use duplicates::{DuplicateDetector, ScanError};
pub use hasher::ContentHasher;
pub use mover::{Mover, PlaceError};
pub use organizer::{OrganizeError, Organizer};
pub use rename::{RenameEngine, RenamePolicy, SpaceTransform};
pub use report::{Progress, RunResult, SilentProgress};

pub use cli::{Cli, run};
