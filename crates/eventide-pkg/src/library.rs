//! Library identities: a package name plus the version range it was
//! requested with.

use semver::VersionReq;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when parsing a version range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionRangeError {
    #[error("version range is empty")]
    Empty,

    #[error("invalid version range '{range}': {reason}")]
    Invalid { range: String, reason: String },
}

/// A library requested by the project, identified by name and version range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryIdentity {
    /// Package name as written in the reference.
    pub name: String,
    /// Requested version range.
    pub version_range: VersionReq,
}

impl LibraryIdentity {
    pub fn new(name: impl Into<String>, version_range: VersionReq) -> Self {
        Self {
            name: name.into(),
            version_range,
        }
    }

    /// Build an identity from a name and a range in package-reference
    /// notation.
    ///
    /// # Errors
    ///
    /// Returns an error if the range cannot be parsed.
    pub fn parse(name: impl Into<String>, range: &str) -> Result<Self, VersionRangeError> {
        Ok(Self::new(name, parse_version_range(range)?))
    }
}

impl std::fmt::Display for LibraryIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.version_range)
    }
}

/// Parse a version range written in package-reference notation.
///
/// Accepted forms:
/// - `1.2.3`: minimum version, inclusive (`>=1.2.3`)
/// - `[1.2.3]`: exact version
/// - `[1.0,2.0)`, `(1.0,)`, `(,2.0]`: interval notation
/// - anything else is handed to [`VersionReq::parse`] (`^1.2`, `>=1, <2`)
///
/// # Errors
///
/// Returns an error if the text is empty or matches none of the forms.
pub fn parse_version_range(range: &str) -> Result<VersionReq, VersionRangeError> {
    let range = range.trim();
    if range.is_empty() {
        return Err(VersionRangeError::Empty);
    }

    let requirement = if range.starts_with('[') || range.starts_with('(') {
        interval_requirement(range)?
    } else if range.starts_with(|c: char| c.is_ascii_digit()) {
        format!(">={range}")
    } else {
        range.to_string()
    };

    VersionReq::parse(&requirement).map_err(|e| VersionRangeError::Invalid {
        range: range.to_string(),
        reason: e.to_string(),
    })
}

fn interval_requirement(range: &str) -> Result<String, VersionRangeError> {
    let invalid = |reason: &str| VersionRangeError::Invalid {
        range: range.to_string(),
        reason: reason.to_string(),
    };

    let min_inclusive = range.starts_with('[');
    let max_inclusive = match range.chars().last() {
        Some(']') => true,
        Some(')') => false,
        _ => return Err(invalid("unterminated interval")),
    };
    let inner = &range[1..range.len() - 1];

    let Some((min, max)) = inner.split_once(',') else {
        if min_inclusive && max_inclusive && !inner.trim().is_empty() {
            return Ok(format!("={}", inner.trim()));
        }
        return Err(invalid("single-version interval must be written as [x]"));
    };

    let mut comparators = Vec::new();
    if !min.trim().is_empty() {
        let op = if min_inclusive { ">=" } else { ">" };
        comparators.push(format!("{op}{}", min.trim()));
    }
    if !max.trim().is_empty() {
        let op = if max_inclusive { "<=" } else { "<" };
        comparators.push(format!("{op}{}", max.trim()));
    }
    if comparators.is_empty() {
        return Err(invalid("interval has no bounds"));
    }
    Ok(comparators.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    #[test]
    fn bare_version_is_a_minimum() {
        let req = parse_version_range("1.2.3").unwrap();
        assert!(req.matches(&Version::new(1, 2, 3)));
        assert!(req.matches(&Version::new(4, 0, 0)));
        assert!(!req.matches(&Version::new(1, 2, 2)));
    }

    #[test]
    fn interval_notation() {
        let req = parse_version_range("[1.0,2.0)").unwrap();
        assert!(req.matches(&Version::new(1, 0, 0)));
        assert!(req.matches(&Version::new(1, 9, 9)));
        assert!(!req.matches(&Version::new(2, 0, 0)));

        let req = parse_version_range("(1.0.0,]").unwrap();
        assert!(!req.matches(&Version::new(1, 0, 0)));
        assert!(req.matches(&Version::new(1, 0, 1)));

        let exact = parse_version_range("[3.1.0]").unwrap();
        assert!(exact.matches(&Version::new(3, 1, 0)));
        assert!(!exact.matches(&Version::new(3, 1, 1)));
    }

    #[test]
    fn semver_requirements_pass_through() {
        let req = parse_version_range("^2.1").unwrap();
        assert!(req.matches(&Version::new(2, 5, 0)));
        assert!(!req.matches(&Version::new(3, 0, 0)));
    }

    #[test]
    fn invalid_ranges() {
        assert_eq!(parse_version_range("  "), Err(VersionRangeError::Empty));
        assert!(matches!(
            parse_version_range("not-a-version"),
            Err(VersionRangeError::Invalid { .. })
        ));
        assert!(matches!(
            parse_version_range("[1.0"),
            Err(VersionRangeError::Invalid { .. })
        ));
        assert!(matches!(
            parse_version_range("(,)"),
            Err(VersionRangeError::Invalid { .. })
        ));
    }

    #[test]
    fn display_and_equality() {
        let a = LibraryIdentity::parse("Contoso.Widgets", "1.0.0").unwrap();
        let b = LibraryIdentity::parse("Contoso.Widgets", ">=1.0.0").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Contoso.Widgets >=1.0.0");
    }
}
