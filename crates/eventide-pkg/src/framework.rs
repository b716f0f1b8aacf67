//! Target framework monikers and their resolution from project properties.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Project type guid of Universal Windows Platform projects.
pub const UWP_PROJECT_GUID: &str = "{A5A43C5B-DE2A-4C0C-9213-0A381AF9435A}";
/// Project type guid of Xamarin.Android projects.
pub const ANDROID_PROJECT_GUID: &str = "{EFBA0AD7-5A72-4C68-AF49-83D382785DCF}";
/// Project type guid of Xamarin.iOS projects.
pub const IOS_PROJECT_GUID: &str = "{FEACFBD2-3405-455C-9665-78FE426C6842}";
/// Project type guid of Xamarin.Mac projects.
pub const MAC_PROJECT_GUID: &str = "{A3F8F2AB-B479-4A4A-A458-A89E7DC349F1}";

/// Platform version used for UWP projects that do not set one.
const DEFAULT_UWP_VERSION: &str = "10.0";

/// Errors that can occur when parsing a framework moniker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("invalid target framework '{0}'")]
    InvalidMoniker(String),

    #[error("invalid framework version '{0}', expected a form like v4.7.2")]
    InvalidVersion(String),
}

/// A short framework moniker such as `net8.0`, `netstandard2.0` or `net472`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetFramework {
    /// Lower-case identifier, e.g. `net`, `netstandard`, `uap`, `monoandroid`
    pub identifier: String,
    /// Version components; `net472` yields `[4, 7, 2]`
    pub version: Vec<u32>,
    /// Platform suffix after a dash, e.g. `windows` in `net8.0-windows`
    pub platform: Option<String>,
}

/// Short moniker: identifier, version digits, optional platform suffix
static MONIKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]+?)(\d+(?:\.\d+)*)(?:-([a-z0-9.]+))?$").expect("moniker pattern is valid")
});

impl TargetFramework {
    /// Parse a short moniker. Matching is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns an error if the moniker has no identifier or version.
    pub fn parse(moniker: &str) -> Result<Self, FrameworkError> {
        let normalized = moniker.trim().to_lowercase();
        let captures = MONIKER_RE
            .captures(&normalized)
            .ok_or_else(|| FrameworkError::InvalidMoniker(moniker.to_string()))?;

        let identifier = captures[1].to_string();
        let digits = &captures[2];
        let version = if digits.contains('.') {
            digits
                .split('.')
                .map(str::parse)
                .collect::<Result<Vec<u32>, _>>()
                .map_err(|_| FrameworkError::InvalidMoniker(moniker.to_string()))?
        } else {
            // Compact form: one digit per component (`net472`, `monoandroid90`)
            digits.chars().filter_map(|c| c.to_digit(10)).collect()
        };

        Ok(Self {
            identifier,
            version,
            platform: captures.get(3).map(|m| m.as_str().to_string()),
        })
    }

    /// Parse a `;`-separated list, skipping empty entries.
    ///
    /// # Errors
    ///
    /// Returns the first moniker that fails to parse.
    pub fn parse_list(monikers: &str) -> Result<Vec<Self>, FrameworkError> {
        monikers
            .split(';')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Framework family; `net` below version 5 is .NET Framework, and
    /// `netcoreapp` shares a family with `net5.0` onwards.
    fn family(&self) -> &str {
        match self.identifier.as_str() {
            "net" if self.version.first().is_some_and(|major| *major < 5) => "netframework",
            "netcoreapp" => "net",
            identifier => identifier,
        }
    }

    /// Whether an assembly built for `other` can be used by this framework.
    ///
    /// Families must match and the other version may not be newer.
    /// `netstandard` assemblies are usable from any framework.
    pub fn accepts(&self, other: &TargetFramework) -> bool {
        if other.identifier == "netstandard" {
            return true;
        }
        self.family() == other.family() && other.version <= self.version
    }

    /// Short moniker text.
    pub fn moniker(&self) -> String {
        let dotted = match self.identifier.as_str() {
            "net" => self.version.first().is_some_and(|major| *major >= 5),
            "netstandard" | "netcoreapp" | "uap" => true,
            _ => false,
        };
        let version = if dotted {
            self.version
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(".")
        } else {
            self.version.iter().map(u32::to_string).collect()
        };
        match &self.platform {
            Some(platform) => format!("{}{version}-{platform}", self.identifier),
            None => format!("{}{version}", self.identifier),
        }
    }
}

impl std::fmt::Display for TargetFramework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.moniker())
    }
}

/// Compact digits for a `vX.Y.Z` framework version: `v4.7.2` gives `472`.
fn compact_version(framework_version: &str) -> Result<String, FrameworkError> {
    let trimmed = framework_version.trim();
    let digits = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(FrameworkError::InvalidVersion(framework_version.to_string()));
    }
    Ok(digits.chars().filter(char::is_ascii_digit).collect())
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolve the frameworks to extract assemblies for.
///
/// Resolution order:
/// 1. `target_framework`, a `;`-separated moniker list
/// 2. project type guids: UWP uses `platform_version`, Xamarin platforms use
///    `framework_version`
/// 3. a bare `framework_version` such as `v4.7.2` (`net472`)
///
/// Returns `Ok(None)` when nothing usable is set.
///
/// # Errors
///
/// Returns an error if a value that is set cannot be parsed.
pub fn resolve_frameworks(
    target_framework: Option<&str>,
    framework_version: Option<&str>,
    platform_version: Option<&str>,
    project_type_guids: Option<&str>,
) -> Result<Option<Vec<TargetFramework>>, FrameworkError> {
    if let Some(monikers) = present(target_framework) {
        let frameworks = TargetFramework::parse_list(monikers)?;
        if !frameworks.is_empty() {
            debug!(source = "target framework", count = frameworks.len(), "resolved frameworks");
            return Ok(Some(frameworks));
        }
    }

    if let Some(guids) = present(project_type_guids) {
        let guids = guids.to_uppercase();
        let has = |guid: &str| guids.split(';').any(|g| g.trim() == guid);

        let moniker = if has(UWP_PROJECT_GUID) {
            let version = present(platform_version).unwrap_or(DEFAULT_UWP_VERSION);
            Some(format!("uap{version}"))
        } else if has(ANDROID_PROJECT_GUID) {
            present(framework_version)
                .map(compact_version)
                .transpose()?
                .map(|digits| format!("monoandroid{digits}"))
        } else if has(IOS_PROJECT_GUID) {
            Some("xamarinios10".to_string())
        } else if has(MAC_PROJECT_GUID) {
            Some("xamarinmac20".to_string())
        } else {
            None
        };

        if let Some(moniker) = moniker {
            debug!(source = "project type", moniker = %moniker, "resolved frameworks");
            return Ok(Some(vec![TargetFramework::parse(&moniker)?]));
        }
    }

    if let Some(version) = present(framework_version) {
        let moniker = format!("net{}", compact_version(version)?);
        debug!(source = "framework version", moniker = %moniker, "resolved frameworks");
        return Ok(Some(vec![TargetFramework::parse(&moniker)?]));
    }

    Ok(None)
}
