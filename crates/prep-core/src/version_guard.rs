//! Installed-version check against the project's lock file.

use semver::{Version, VersionReq};
use serde::Deserialize;
use std::path::Path;

use crate::error::{PrepError, Result};
use crate::json;

/// The parts of `composer.lock` the version check needs.
#[derive(Debug, Default, Deserialize)]
pub struct DependencyManifest {
    #[serde(default)]
    pub packages: Vec<PackageRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
}

impl DependencyManifest {
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = json::read_source(path)?;
        serde_json::from_str(&source).map_err(|source| PrepError::MalformedDocument {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Version of the first record named exactly `package`.
pub fn extract_version<'a>(manifest: &'a DependencyManifest, package: &str) -> Option<&'a str> {
    manifest
        .packages
        .iter()
        .find(|record| record.name == package)
        .map(|record| record.version.as_str())
}

/// Check `version` against the caret range `^min_version`.
///
/// Anything other than digits and dots is rejected outright, so `5.8.0-beta`
/// or `dev-main` never get a chance to satisfy the range.
pub fn validate(package: &str, version: &str, min_version: &str) -> Result<()> {
    let invalid = || PrepError::InvalidVersion {
        package: package.to_string(),
        version: version.to_string(),
    };

    let parsed = parse_numeric(version).ok_or_else(invalid)?;
    let minimum = parse_numeric(min_version).ok_or_else(|| PrepError::InvalidVersion {
        package: package.to_string(),
        version: min_version.to_string(),
    })?;

    let req = VersionReq::parse(&format!("^{minimum}")).map_err(|_| invalid())?;
    if !req.matches(&parsed) {
        return Err(PrepError::VersionTooOld {
            package: package.to_string(),
            version: version.to_string(),
            minimum: min_version.to_string(),
        });
    }
    Ok(())
}

/// Parse `1`, `1.2`, `1.2.3` or a four-part composer version into a semver
/// version. Missing components are zero, a fourth component is dropped.
fn parse_numeric(version: &str) -> Option<Version> {
    if version.is_empty() || !version.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    let parts = version
        .split('.')
        .map(|part| part.parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;
    if parts.len() > 4 {
        return None;
    }

    let at = |i: usize| parts.get(i).copied().unwrap_or(0);
    Some(Version::new(at(0), at(1), at(2)))
}
