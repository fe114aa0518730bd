//! Run configuration.
//!
//! All policies driving a run (classification rules, renaming, date
//! bucketing, exclusions) are loaded from a TOML file or fall back to
//! built-in defaults. Classification rules are declared as an array of
//! tables so their order is preserved; order decides which rule wins when
//! an extension appears in more than one category.
//!
//! # Configuration File Format
//!
//! ```toml
//! [[rules]]
//! category = "Imagenes"
//! extensions = ["jpg", "png", "gif"]
//!
//! [[rules]]
//! category = "Documentos"
//! [[rules.subcategories]]
//! name = "Oficina"
//! extensions = ["docx", "xlsx", "pptx"]
//!
//! [rename]
//! prefix = "BK"
//! add_date = true
//! spaces = "underscore"
//!
//! [dates]
//! mode = "month"
//!
//! [exclusions]
//! prefixes = ["~", ".", "$"]
//! extensions = ["tmp", "log"]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::classifier::{CategoryRule, ClassificationRuleSet, DateMode, DateRange};
use crate::collector::ExclusionPolicy;
use crate::rename::RenamePolicy;

/// Errors that can occur while loading configuration. These reject a run
/// before any walk begins.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax, structure, or rule contents.
    ConfigInvalid(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Creation-date bucketing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateConfig {
    /// Bucketing mode; `None` disables date classification.
    #[serde(default)]
    pub mode: Option<DateMode>,
    /// Inclusive interval for `range` mode.
    #[serde(default)]
    pub range: Option<DateRange>,
}

/// Complete run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Ordered classification rules.
    #[serde(default = "default_rules")]
    pub rules: ClassificationRuleSet,

    /// Renaming policy applied during organize runs.
    #[serde(default)]
    pub rename: RenamePolicy,

    /// Date bucketing configuration.
    #[serde(default)]
    pub dates: DateConfig,

    /// Files dropped before classification during collect runs.
    #[serde(default)]
    pub exclusions: ExclusionPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            rename: RenamePolicy::default(),
            dates: DateConfig::default(),
            exclusions: ExclusionPolicy::default(),
        }
    }
}

/// Built-in rule table used when no configuration file declares one.
pub fn default_rules() -> ClassificationRuleSet {
    ClassificationRuleSet::new(vec![
        CategoryRule::flat(
            "Imagenes",
            &["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"],
        ),
        CategoryRule::flat(
            "Documentos",
            &["pdf", "doc", "docx", "txt", "md", "odt", "rtf"],
        ),
        CategoryRule::flat("Hojas", &["xls", "xlsx", "csv", "ods"]),
        CategoryRule::flat("Musica", &["mp3", "wav", "flac", "ogg", "m4a"]),
        CategoryRule::flat("Videos", &["mp4", "mkv", "avi", "mov", "webm"]),
        CategoryRule::flat("Comprimidos", &["zip", "rar", "7z", "tar", "gz"]),
    ])
}

impl AppConfig {
    /// Load configuration with fallback to defaults.
    ///
    /// Attempts, in order:
    /// 1. The explicitly provided path
    /// 2. `.ordena.toml` in the current directory
    /// 3. `~/.config/ordena/config.toml`
    /// 4. Built-in defaults
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly provided file cannot be read, or if
    /// whichever file is found fails parsing or validation.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".ordena.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("ordena")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file and validate it.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that could not drive a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules.validate().map_err(ConfigError::ConfigInvalid)?;

        if let Some(range) = &self.dates.range
            && range.start > range.end
        {
            return Err(ConfigError::ConfigInvalid(format!(
                "date range starts after it ends ({} > {})",
                range.start, range.end
            )));
        }
        if self.dates.mode == Some(DateMode::Range) && self.dates.range.is_none() {
            return Err(ConfigError::ConfigInvalid(
                "date mode 'range' requires [dates].range".to_string(),
            ));
        }

        // Surface bad glob patterns now rather than mid-run
        for pattern in &self.exclusions.patterns {
            if glob::Pattern::new(pattern).is_err() {
                return Err(ConfigError::ConfigInvalid(format!(
                    "invalid exclusion pattern '{pattern}'"
                )));
            }
        }
        Ok(())
    }
}
