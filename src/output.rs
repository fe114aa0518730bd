//! Output formatting and styling.
//!
//! All console output goes through this module; the core modules only
//! return results and emit progress events, so formatting can change
//! globally in one place.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use crate::analyzer::AnalysisReport;
use crate::report::{Progress, RunResult};

/// Manages all CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Renders a run result as a key/value table, followed by the
    /// destination directories and any per-file errors.
    pub fn run_summary(result: &RunResult) {
        Self::header("SUMMARY");

        let rows = result.to_rows();
        let key_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in &rows {
            println!("{:<width$} | {}", key, value.green(), width = key_width);
        }

        if !result.destinations.is_empty() {
            Self::header("DESTINATIONS");
            for dest in &result.destinations {
                println!(" - {}", dest.display());
            }
        }

        if !result.errors.is_empty() {
            Self::header("ERRORS");
            for error in &result.errors {
                eprintln!(" {} {}: {}", "✗".red(), error.name, error.message);
            }
        }
    }

    /// Renders a folder analysis: totals, the largest (or smallest) files,
    /// and per-folder statistics.
    pub fn analysis_summary(report: &AnalysisReport, top: usize) {
        Self::header("ANALYSIS");
        println!("Total files: {}", report.total_files.to_string().green());
        println!(
            "Total size:  {} {}",
            report.total_size.to_string().green(),
            report.unit
        );

        Self::header("FILES");
        for (path, size) in report.files.iter().take(top) {
            println!(" {:>10.2} {} | {}", size, report.unit, path.display());
        }

        Self::header("FOLDERS");
        for (path, stats) in &report.folders {
            println!(
                " {} | {} {}, {} files, {} subfolders",
                path.display(),
                stats.size,
                report.unit,
                stats.files,
                stats.subfolders
            );
        }
    }
}

/// A progress spinner fed by the core's per-file events.
pub struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    /// Creates a spinner for a walk of unknown length.
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {pos} files {msg}")
                .expect("Invalid progress bar template"),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Finishes and clears the spinner.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Progress for SpinnerProgress {
    fn file_scanned(&self, path: &Path) {
        self.bar.inc(1);
        if let Some(name) = path.file_name() {
            self.bar.set_message(name.to_string_lossy().to_string());
        }
    }
}
