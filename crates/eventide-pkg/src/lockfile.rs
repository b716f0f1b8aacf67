//! Lock file recording the libraries a generated file was produced from.
//!
//! The lock file is a change-detection cache: when the requested libraries
//! match the locked set, regeneration can be skipped.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::library::LibraryIdentity;

/// Default lock file name.
pub const LOCK_FILE: &str = "eventide.lock.json";

/// Errors that can occur when reading or writing a lock file.
#[derive(Error, Debug)]
pub enum LockError {
    #[error("failed to access lock file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse lock file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The set of libraries recorded by the last successful generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lockfile {
    pub libraries: Vec<LibraryIdentity>,
}

impl Lockfile {
    pub fn new(libraries: Vec<LibraryIdentity>) -> Self {
        Self { libraries }
    }

    /// Parse lock file JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a lock file.
    pub fn parse(content: &str) -> Result<Self, LockError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a lock file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LockError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Serialize to indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_string(&self) -> Result<String, LockError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the lock file, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LockError> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    /// Whether `libraries` is the locked set: same count, and every locked
    /// identity appears among them. Order does not matter.
    pub fn is_up_to_date(&self, libraries: &[LibraryIdentity]) -> bool {
        self.libraries.len() == libraries.len()
            && self.libraries.iter().all(|locked| libraries.contains(locked))
    }
}
