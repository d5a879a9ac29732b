//! Package version parsing

use anyhow::Result;
use semver::Version;

/// Parse version string, handling various formats
pub fn parse_version(version_str: &str) -> Result<Version> {
    // Remove leading 'v' if present
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

/// Normalize a version for the manifest (`v1.2.3` becomes `1.2.3`)
pub fn normalize_version(version_str: &str) -> Result<String> {
    parse_version(version_str).map(|v| v.to_string())
}
