//! Streaming content identification.
//!
//! Files are read in fixed-size blocks and fed into SHA-256; equal digests
//! are treated as equal content. Whole files are never loaded into memory.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Default read block size in bytes.
pub const DEFAULT_BLOCK_SIZE: usize = 64 * 1024;

/// Computes hex-encoded SHA-256 digests of file contents.
#[derive(Debug, Clone)]
pub struct ContentHasher {
    block_size: usize,
}

impl ContentHasher {
    /// Creates a hasher with the default block size.
    pub fn new() -> Self {
        Self::with_block_size(DEFAULT_BLOCK_SIZE)
    }

    /// Creates a hasher reading in blocks of `block_size` bytes.
    pub fn with_block_size(block_size: usize) -> Self {
        Self { block_size }
    }

    /// Streams the file at `path` through SHA-256 and returns the hex digest.
    ///
    /// Any I/O failure (permission denied, file removed mid-scan) is returned
    /// to the caller, which is expected to skip the file and continue.
    ///
    /// # Arguments
    ///
    /// * `path` - File whose content to hash
    ///
    /// # Example
    ///
    /// ```no_run
    /// use ordena::hasher::ContentHasher;
    /// use std::path::Path;
    ///
    /// let digest = ContentHasher::new().digest(Path::new("photo.jpg"))?;
    /// assert_eq!(digest.len(), 64);
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn digest(&self, path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; self.block_size];

        loop {
            let read = file.read(&mut buffer)?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(hex::encode(hasher.finalize()))
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}
