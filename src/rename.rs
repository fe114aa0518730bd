//! Filename transformations applied before a file is moved.
//!
//! The engine is pure: it takes a filename and a date and returns the new
//! name, performing no I/O. The caller decides which date to supply (file
//! creation date or today, per [`RenamePolicy::use_creation_date`]).

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::mover::split_name;

/// How whitespace in a file stem is handled.
///
/// Exactly one transform applies per run; this replaces the mutually
/// exclusive boolean flags of older configurations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceTransform {
    /// Leave spaces untouched.
    #[default]
    None,
    /// Remove all spaces.
    Remove,
    /// Replace spaces with underscores.
    Underscore,
    /// Uppercase each character following a space, then drop the spaces.
    CamelCase,
}

impl std::str::FromStr for SpaceTransform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "remove" => Ok(Self::Remove),
            "underscore" => Ok(Self::Underscore),
            "camel_case" | "camelcase" | "camel-case" => Ok(Self::CamelCase),
            other => Err(format!(
                "unknown space transform '{other}' (expected none, remove, underscore or camel_case)"
            )),
        }
    }
}

/// User-configured renaming rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenamePolicy {
    /// Prefix prepended to the stem (empty string disables it).
    #[serde(default)]
    pub prefix: String,
    /// Prefix the stem as `{prefix}_{YYYY-MM-DD}_{stem}`.
    #[serde(default)]
    pub add_date: bool,
    /// Use the file's creation date for the date prefix; otherwise today.
    #[serde(default = "default_true")]
    pub use_creation_date: bool,
    /// Strip a trailing ` (N)` suffix left by OS-level duplicate naming.
    #[serde(default)]
    pub strip_duplicate_suffix: bool,
    /// Whitespace handling for the stem.
    #[serde(default)]
    pub spaces: SpaceTransform,
}

fn default_true() -> bool {
    true
}

impl Default for RenamePolicy {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            add_date: false,
            use_creation_date: true,
            strip_duplicate_suffix: false,
            spaces: SpaceTransform::None,
        }
    }
}

/// Applies a [`RenamePolicy`] to filenames.
pub struct RenameEngine {
    policy: RenamePolicy,
    duplicate_suffix: Regex,
    camel_boundary: Regex,
}

impl RenameEngine {
    pub fn new(policy: RenamePolicy) -> Self {
        Self {
            policy,
            duplicate_suffix: Regex::new(r"\s\(\d+\)$").expect("Invalid duplicate suffix pattern"),
            camel_boundary: Regex::new(r" (.)").expect("Invalid camel-case pattern"),
        }
    }

    /// Transforms `filename`, returning the new name.
    ///
    /// Steps, in order: strip the trailing ` (N)` suffix, apply the
    /// whitespace transform, compose the prefix/date. The extension is
    /// carried over unchanged. `date` only matters when `add_date` is set.
    pub fn apply(&self, filename: &str, date: NaiveDate) -> String {
        let (stem, ext) = split_name(filename);
        let mut name = stem.to_string();

        if self.policy.strip_duplicate_suffix {
            name = self.duplicate_suffix.replace(&name, "").into_owned();
        }

        name = match self.policy.spaces {
            SpaceTransform::None => name,
            SpaceTransform::Remove => name.replace(' ', ""),
            SpaceTransform::Underscore => name.replace(' ', "_"),
            SpaceTransform::CamelCase => {
                let joined = self
                    .camel_boundary
                    .replace_all(&name, |caps: &regex::Captures| caps[1].to_uppercase());
                joined.replace(' ', "")
            }
        };

        if self.policy.add_date {
            name = format!("{}_{}_{}", self.policy.prefix, date.format("%Y-%m-%d"), name);
        } else if !self.policy.prefix.is_empty() {
            name = format!("{}_{}", self.policy.prefix, name);
        }

        format!("{name}{ext}")
    }

    pub fn policy(&self) -> &RenamePolicy {
        &self.policy
    }
}
