//! Package references as declared by the project, and their reduction to
//! the library identities handed to the generator.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::library::{parse_version_range, LibraryIdentity};

/// Packages that belong to the generator itself and are never wrapped.
pub const DEFAULT_EXCLUSIONS: &[&str] = &["Eventide.Build", "Eventide.Common"];

/// Errors that can occur when reading a package reference.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("package reference '{0}' is missing a version, expected name@range")]
    MissingVersion(String),

    #[error("package reference has an empty name")]
    EmptyName,
}

/// A package reference as written in the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageReference {
    pub name: String,
    /// Version range text, unparsed.
    pub version: String,
}

impl PackageReference {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl std::str::FromStr for PackageReference {
    type Err = ReferenceError;

    /// Parse `name@range`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, version) = s
            .split_once('@')
            .ok_or_else(|| ReferenceError::MissingVersion(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ReferenceError::EmptyName);
        }
        Ok(Self::new(name, version.trim()))
    }
}

/// Case-insensitive set of excluded package names.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    names: Vec<String>,
}

impl ExclusionSet {
    /// The built-in exclusions plus `extra`.
    pub fn with_defaults<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self { names: Vec::new() };
        for name in DEFAULT_EXCLUSIONS {
            set.insert(name);
        }
        for name in extra {
            set.insert(name.as_ref());
        }
        set
    }

    pub fn insert(&mut self, name: &str) {
        let name = name.to_lowercase();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.names.iter().any(|n| *n == name)
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::with_defaults(std::iter::empty::<&str>())
    }
}

/// Reduce package references to library identities, in reference order.
///
/// Excluded packages are dropped. References whose version does not parse
/// are logged and skipped; they never fail the collection.
pub fn collect_libraries(
    references: &[PackageReference],
    exclusions: &ExclusionSet,
) -> Vec<LibraryIdentity> {
    let mut libraries = Vec::with_capacity(references.len());
    for reference in references {
        if exclusions.contains(&reference.name) {
            debug!(package = %reference.name, "excluded package reference");
            continue;
        }

        match parse_version_range(&reference.version) {
            Ok(range) => libraries.push(LibraryIdentity::new(reference.name.clone(), range)),
            Err(err) => {
                error!(
                    package = %reference.name,
                    error = %err,
                    "package does not have a valid version"
                );
            }
        }
    }
    libraries
}
