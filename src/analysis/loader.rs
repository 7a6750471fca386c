//! Content retrieval seam between the analyzer and wherever files live.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while loading a single file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("content unavailable: {0}")]
    Unavailable(String),
}

/// Supplies the raw text of a file given its path.
pub trait ContentLoader {
    fn load(&self, path: &str) -> Result<String, LoadError>;
}

impl<F> ContentLoader for F
where
    F: Fn(&str) -> Result<String, LoadError>,
{
    fn load(&self, path: &str) -> Result<String, LoadError> {
        self(path)
    }
}

/// Loads files from disk, resolving paths against a base directory.
#[derive(Debug, Clone)]
pub struct FsLoader {
    base_dir: PathBuf,
}

impl FsLoader {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }
}

impl ContentLoader for FsLoader {
    fn load(&self, path: &str) -> Result<String, LoadError> {
        let full = self.base_dir.join(path);
        let bytes = fs::read(&full).map_err(|source| LoadError::Io {
            path: path.to_string(),
            source,
        })?;
        // Non-UTF-8 bytes become replacement characters.
        Ok(String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned()))
    }
}
