//! Collision-safe file placement.
//!
//! Every mode of ordena relocates files through this module. Placement
//! guarantees that no existing file at the destination is ever overwritten:
//! when the desired name is taken, the stem is suffixed with `_1`, `_2`, ...
//! until a free name is found.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while placing a file.
#[derive(Debug)]
pub enum PlaceError {
    /// Failed to create the destination directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to move the file to its resolved destination.
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

impl std::fmt::Display for PlaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::MoveFailed { from, to, source } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for PlaceError {}

/// Result type for placement operations.
pub type PlaceResult<T> = Result<T, PlaceError>;

/// Splits a filename into (stem, extension including the leading dot).
///
/// A name with no dot, or a leading-dot name like `.gitignore`, is treated
/// as all stem.
pub(crate) fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Moves files into destination directories without overwriting anything.
pub struct Mover;

impl Mover {
    /// Moves `source` into `dest_dir` under `desired_name`, creating the
    /// directory (and ancestors) if absent.
    ///
    /// If `desired_name` is taken, probes `stem_1.ext`, `stem_2.ext`, ... in
    /// increasing order and uses the first free name. Returns the final path
    /// the file ended up at.
    ///
    /// # Arguments
    ///
    /// * `source` - File to relocate
    /// * `dest_dir` - Directory that receives the file
    /// * `desired_name` - Preferred filename at the destination
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ordena::mover::Mover;
    /// use std::path::Path;
    ///
    /// let placed = Mover::place(
    ///     Path::new("downloads/report.pdf"),
    ///     Path::new("sorted/Documentos"),
    ///     "report.pdf",
    /// )?;
    /// println!("Placed at {}", placed.display());
    /// # Ok::<(), ordena::mover::PlaceError>(())
    /// ```
    pub fn place(source: &Path, dest_dir: &Path, desired_name: &str) -> PlaceResult<PathBuf> {
        fs::create_dir_all(dest_dir).map_err(|e| PlaceError::DirectoryCreationFailed {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        let mut destination = dest_dir.join(desired_name);
        if destination.exists() {
            let (stem, ext) = split_name(desired_name);
            let mut counter = 1;
            loop {
                let candidate = dest_dir.join(format!("{stem}_{counter}{ext}"));
                if !candidate.exists() {
                    destination = candidate;
                    break;
                }
                counter += 1;
            }
        }

        move_file(source, &destination).map_err(|e| PlaceError::MoveFailed {
            from: source.to_path_buf(),
            to: destination.clone(),
            source: e,
        })?;

        Ok(destination)
    }
}

/// Renames in place, falling back to copy + remove when the destination is
/// on a different filesystem.
fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("file.txt"), ("file", ".txt"));
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_name("noext"), ("noext", ""));
        assert_eq!(split_name(".gitignore"), (".gitignore", ""));
    }

    #[test]
    fn test_place_creates_directory_and_moves() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("a.txt");
        fs::write(&source, "content").expect("Failed to write file");

        let dest_dir = temp_dir.path().join("nested").join("dest");
        let placed = Mover::place(&source, &dest_dir, "a.txt").expect("Failed to place file");

        assert_eq!(placed, dest_dir.join("a.txt"));
        assert!(!source.exists());
        assert!(placed.exists());
    }

    #[test]
    fn test_place_resolves_collisions_with_suffixes() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = temp_dir.path().join("dest");

        let mut placed = Vec::new();
        for i in 0..4 {
            let source = temp_dir.path().join(format!("src{i}.txt"));
            fs::write(&source, format!("content {i}")).expect("Failed to write file");
            placed.push(
                Mover::place(&source, &dest_dir, "report.txt").expect("Failed to place file"),
            );
        }

        assert_eq!(placed[0], dest_dir.join("report.txt"));
        assert_eq!(placed[1], dest_dir.join("report_1.txt"));
        assert_eq!(placed[2], dest_dir.join("report_2.txt"));
        assert_eq!(placed[3], dest_dir.join("report_3.txt"));
        for path in &placed {
            assert!(path.exists());
        }
        // No overwrite: contents are all distinct
        assert_eq!(
            fs::read_to_string(&placed[0]).expect("read"),
            "content 0"
        );
        assert_eq!(
            fs::read_to_string(&placed[3]).expect("read"),
            "content 3"
        );
    }

    #[test]
    fn test_place_handles_names_without_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dest_dir = temp_dir.path().join("dest");

        for i in 0..2 {
            let source = temp_dir.path().join(format!("src{i}"));
            fs::write(&source, "x").expect("Failed to write file");
            Mover::place(&source, &dest_dir, "README").expect("Failed to place file");
        }

        assert!(dest_dir.join("README").exists());
        assert!(dest_dir.join("README_1").exists());
    }

    #[test]
    fn test_place_missing_source_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = Mover::place(
            &temp_dir.path().join("gone.txt"),
            temp_dir.path(),
            "gone.txt",
        );
        assert!(result.is_err());
    }
}
