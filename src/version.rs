use std::fmt;
use std::fs;
use std::path::Path;

use log::debug;

use crate::error::{ChrnError, Result};

/// Represents a semantic version with major, minor, and patch components.
///
/// Pre-release and build metadata are accepted on input but discarded, a bump
/// always operates on the release triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

/// Represents the type of semantic version bump to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl VersionBump {
    /// Looks up a bump kind by its command-line name.
    ///
    /// Returns `None` for anything other than `major`, `minor` or `patch`.
    pub fn from_name(kind: &str) -> Option<Self> {
        match kind {
            "major" => Some(VersionBump::Major),
            "minor" => Some(VersionBump::Minor),
            "patch" => Some(VersionBump::Patch),
            _ => None,
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionBump::Major => "major",
            VersionBump::Minor => "minor",
            VersionBump::Patch => "patch",
        };
        f.write_str(name)
    }
}

impl Version {
    /// Creates a new Version with the specified major, minor, and patch components.
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parses a bare `X.Y.Z` version string.
    ///
    /// Tag prefixes such as `v` must already be stripped; `"v1.2.3"` is rejected.
    ///
    /// # Example
    /// ```
    /// # use chrn::version::Version;
    /// assert_eq!(Version::parse("1.2.3").unwrap(), Version::new(1, 2, 3));
    /// assert!(Version::parse("1.2").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let parsed = semver::Version::parse(input.trim()).map_err(|e| {
            ChrnError::parse(format!("Invalid version '{}': {}", input, e))
        })?;

        Ok(Version::new(parsed.major, parsed.minor, parsed.patch))
    }

    /// Bumps the version according to the bump type.
    ///
    /// Increments the selected component and resets the lower ones to 0:
    /// - **Major**: major += 1, minor = 0, patch = 0
    /// - **Minor**: minor += 1, patch = 0
    /// - **Patch**: patch += 1
    ///
    /// A component already at `u64::MAX` cannot be incremented and yields a
    /// parse error.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let overflow = || {
            ChrnError::parse(format!(
                "cannot apply a {} bump to {}: component overflow",
                bump_type, self
            ))
        };

        Ok(match bump_type {
            VersionBump::Major => {
                Version::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0)
            }
            VersionBump::Minor => {
                Version::new(self.major, self.minor.checked_add(1).ok_or_else(overflow)?, 0)
            }
            VersionBump::Patch => Version::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        })
    }

    /// Bumps by a bump-kind name, leaving the version untouched for unknown names.
    ///
    /// Reporting an unknown name is left to the caller.
    pub fn bump_by_name(&self, kind: &str) -> Result<Self> {
        match VersionBump::from_name(kind) {
            Some(bump_type) => self.bump(bump_type),
            None => {
                debug!("unknown bump kind '{}', keeping {}", kind, self);
                Ok(*self)
            }
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Parses `current` and returns the next version string for the bump kind.
///
/// # Example
/// ```
/// # use chrn::version::bump;
/// assert_eq!(bump("1.2.3", "minor").unwrap(), "1.3.0");
/// ```
pub fn bump(current: &str, kind: &str) -> Result<String> {
    Ok(Version::parse(current)?.bump_by_name(kind)?.to_string())
}

/// Contents of the single-line version file: `VERSION = "<tag>"`
pub fn version_file_contents(tag: &str) -> String {
    format!("VERSION = \"{}\"\n", tag)
}

/// Overwrite the version file with `tag`.
pub fn write_version_file(path: &Path, tag: &str) -> Result<()> {
    fs::write(path, version_file_contents(tag)).map_err(|e| {
        ChrnError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot write version file {}: {}", path.display(), e),
        ))
    })
}
