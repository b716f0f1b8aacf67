//! Package handling for eventide.
//!
//! This crate provides:
//! - Library identities with semver version ranges
//! - Package reference collection with the exclusion list
//! - Target framework parsing and resolution from project properties
//! - Lock file support for skipping unchanged regenerations

mod framework;
mod library;
mod lockfile;
mod reference;

pub use framework::{
    resolve_frameworks, FrameworkError, TargetFramework, ANDROID_PROJECT_GUID, IOS_PROJECT_GUID,
    MAC_PROJECT_GUID, UWP_PROJECT_GUID,
};
pub use library::{parse_version_range, LibraryIdentity, VersionRangeError};
pub use lockfile::{LockError, Lockfile, LOCK_FILE};
pub use reference::{
    collect_libraries, ExclusionSet, PackageReference, ReferenceError, DEFAULT_EXCLUSIONS,
};
