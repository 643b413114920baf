//! Path resolution for studoro configuration and data files.
//!
//! All studoro data lives in `~/.studoro/`:
//! - `config.yaml` - Main configuration file
//! - `studoro.db` - SQLite database (sessions, subjects, tasks, profile)
//!
//! The `STUDORO_HOME` environment variable overrides the root directory,
//! which is how integration tests sandbox the binary.

use std::path::PathBuf;

use crate::error::StudoroError;

/// Paths to studoro configuration and data files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.studoro/`
    pub root: PathBuf,
    /// Config file: `~/.studoro/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.studoro/studoro.db`
    pub database: PathBuf,
}

impl Paths {
    /// Resolve paths from `STUDORO_HOME` or the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `STUDORO_HOME` nor `HOME` is set.
    pub fn new() -> Result<Self, StudoroError> {
        if let Ok(root) = std::env::var("STUDORO_HOME") {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            StudoroError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".studoro")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("studoro.db"),
            root,
        }
    }

    /// Ensure the root directory exists, creating it if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), StudoroError> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root).map_err(|e| {
                StudoroError::Config(format!(
                    "Failed to create directory {}: {e}",
                    self.root.display()
                ))
            })?;
        }
        Ok(())
    }
}
