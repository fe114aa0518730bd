//! Command-line interface.
//!
//! Parses user choices into the configuration structs the core consumes,
//! dispatches the selected mode, and renders the resulting [`RunResult`].

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::analyzer::{FolderAnalyzer, SizeUnit, SortOrder};
use crate::classifier::{DateMode, DateRange};
use crate::collector::Collector;
use crate::config::AppConfig;
use crate::duplicates::DuplicateDetector;
use crate::organizer::Organizer;
use crate::output::{OutputFormatter, SpinnerProgress};
use crate::rename::SpaceTransform;
use crate::report::RunResult;

#[derive(Debug, Parser)]
#[command(
    name = "ordena",
    version,
    about = "Scan, deduplicate, and organize directories by content, category, or creation date."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Move content duplicates into a 'duplicates' directory under the root.
    Dedupe {
        /// Directory to scan.
        path: PathBuf,
        /// Print the result as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Classify files at the top level of a directory into category folders.
    Organize {
        /// Directory to organize.
        path: PathBuf,
        /// Configuration file (defaults to .ordena.toml, then
        /// ~/.config/ordena/config.toml, then built-in rules).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Bucket by creation date instead of extension rules:
        /// full, day, month, year or range.
        #[arg(long, value_name = "MODE")]
        date_mode: Option<DateMode>,
        /// Inclusive date interval for range mode, as YYYY-MM-DD.
        #[arg(long, num_args = 2, value_names = ["START", "END"])]
        date_range: Option<Vec<NaiveDate>>,
        /// Prefix prepended to every filename.
        #[arg(long)]
        prefix: Option<String>,
        /// Prefix filenames with their date as {prefix}_{YYYY-MM-DD}_{name}.
        #[arg(long)]
        add_date: bool,
        /// Strip trailing ' (N)' duplicate suffixes from filenames.
        #[arg(long)]
        strip_duplicate_suffix: bool,
        /// Whitespace handling: none, remove, underscore or camel_case.
        #[arg(long)]
        spaces: Option<SpaceTransform>,
        /// Print the result as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Collect files by type from a source tree into a destination tree.
    Collect {
        /// Source tree to walk.
        source: PathBuf,
        /// Destination root receiving category directories.
        dest: PathBuf,
        /// Configuration file for rules and exclusions.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the result as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Report folder sizes and counts.
    Analyze {
        /// Directory to analyze.
        path: PathBuf,
        /// Display unit: B, KB, MB or GB.
        #[arg(long, default_value = "MB")]
        unit: SizeUnit,
        /// List smallest files first instead of largest.
        #[arg(long)]
        asc: bool,
        /// How many files to list.
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
}

/// Runs the parsed command. Setup and configuration failures are returned
/// as messages; per-file failures end up inside the run summary instead.
pub fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Dedupe { path, json } => {
            let detector = DuplicateDetector::new(&path).map_err(|e| e.to_string())?;
            OutputFormatter::info(&format!("Scanning {} for duplicates", path.display()));

            let spinner = SpinnerProgress::new("hashing");
            let result = detector.run_with_progress(&spinner);
            spinner.finish();

            render(&result, json)
        }
        Command::Organize {
            path,
            config,
            date_mode,
            date_range,
            prefix,
            add_date,
            strip_duplicate_suffix,
            spaces,
            json,
        } => {
            let mut config = AppConfig::load(config.as_deref()).map_err(|e| e.to_string())?;

            // Flags override the loaded configuration
            if let Some(prefix) = prefix {
                config.rename.prefix = prefix;
            }
            if add_date {
                config.rename.add_date = true;
            }
            if strip_duplicate_suffix {
                config.rename.strip_duplicate_suffix = true;
            }
            if let Some(spaces) = spaces {
                config.rename.spaces = spaces;
            }
            if let Some(mode) = date_mode {
                config.dates.mode = Some(mode);
            }
            if let Some(range) = date_range {
                config.dates.range = Some(DateRange {
                    start: range[0],
                    end: range[1],
                });
            }

            // A date mode replaces extension classification for this run
            let rules = if config.dates.mode.is_some() {
                crate::classifier::ClassificationRuleSet::default()
            } else {
                config.rules
            };

            let organizer = Organizer::new(
                &path,
                rules,
                config.rename,
                config.dates.mode,
                config.dates.range,
            )
            .map_err(|e| e.to_string())?;
            OutputFormatter::info(&format!("Organizing {}", path.display()));

            let spinner = SpinnerProgress::new("classifying");
            let result = organizer.run_with_progress(&spinner);
            spinner.finish();

            render(&result, json)
        }
        Command::Collect {
            source,
            dest,
            config,
            json,
        } => {
            let config = AppConfig::load(config.as_deref()).map_err(|e| e.to_string())?;
            let collector = Collector::new(&source, &dest, config.rules, &config.exclusions)
                .map_err(|e| e.to_string())?;
            OutputFormatter::info(&format!(
                "Collecting {} into {}",
                source.display(),
                dest.display()
            ));

            let spinner = SpinnerProgress::new("collecting");
            let result = collector.run_with_progress(&spinner);
            spinner.finish();

            render(&result, json)
        }
        Command::Analyze {
            path,
            unit,
            asc,
            top,
        } => {
            let order = if asc {
                SortOrder::Ascending
            } else {
                SortOrder::Descending
            };
            let analyzer = FolderAnalyzer::new(&path, unit, order).map_err(|e| e.to_string())?;
            let report = analyzer.run();
            OutputFormatter::analysis_summary(&report, top);
            Ok(())
        }
    }
}

fn render(result: &RunResult, json: bool) -> Result<(), String> {
    if json {
        let payload = serde_json::to_string_pretty(result)
            .map_err(|e| format!("Failed to serialize result: {e}"))?;
        println!("{payload}");
    } else {
        OutputFormatter::run_summary(result);
        if result.errors.is_empty() {
            OutputFormatter::success("Run complete.");
        } else {
            OutputFormatter::warning("Run complete with errors; see above.");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_dedupe() {
        let cli = Cli::try_parse_from(["ordena", "dedupe", "/tmp/x"]).expect("parse");
        assert!(matches!(cli.command, Command::Dedupe { .. }));
    }

    #[test]
    fn test_cli_parses_organize_flags() {
        let cli = Cli::try_parse_from([
            "ordena",
            "organize",
            "/tmp/x",
            "--date-mode",
            "range",
            "--date-range",
            "2023-01-01",
            "2023-06-30",
            "--spaces",
            "underscore",
        ])
        .expect("parse");
        match cli.command {
            Command::Organize {
                date_mode,
                date_range,
                spaces,
                ..
            } => {
                assert_eq!(date_mode, Some(DateMode::Range));
                assert_eq!(date_range.map(|r| r.len()), Some(2));
                assert_eq!(spaces, Some(SpaceTransform::Underscore));
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_date_mode() {
        let result = Cli::try_parse_from(["ordena", "organize", "/tmp/x", "--date-mode", "weekly"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_analyze_unit() {
        let cli =
            Cli::try_parse_from(["ordena", "analyze", "/tmp/x", "--unit", "kb"]).expect("parse");
        match cli.command {
            Command::Analyze { unit, .. } => assert_eq!(unit, SizeUnit::Kb),
            _ => panic!("wrong command"),
        }
    }
}
