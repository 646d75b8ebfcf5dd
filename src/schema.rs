//! Versioned ORCID path tables.
//!
//! The ORCID message format has moved fields between API versions; most
//! notably the author identifier. Paths that differ between versions are
//! looked up here rather than hard-coded into the view types.

use crate::error::{OrcidError, Result};
use crate::path::Path;
use std::fmt;
use std::str::FromStr;

/// ORCID public API message version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchemaVersion {
    /// Identifier at `orcid-profile.orcid.value`.
    V1_1,
    /// Identifier at `orcid-profile.orcid-identifier.path`.
    #[default]
    V1_2,
}

impl SchemaVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1_1 => "1.1",
            Self::V1_2 => "1.2",
        }
    }

    /// Public API root for this version, with trailing slash.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::V1_1 => "https://pub.orcid.org/v1.1/",
            Self::V1_2 => "https://pub.orcid.org/v1.2/",
        }
    }

    /// Where the author's ORCID iD lives in a profile document.
    pub fn orcid_path(&self) -> Path {
        match self {
            Self::V1_1 => Path::dotted("orcid-profile.orcid.value"),
            Self::V1_2 => Path::dotted("orcid-profile.orcid-identifier.path"),
        }
    }

    /// Parse from string (case-insensitive, optional `v` prefix).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.strip_prefix('v').unwrap_or(&s) {
            "1.1" => Some(Self::V1_1),
            "1.2" => Some(Self::V1_2),
            _ => None,
        }
    }
}

impl FromStr for SchemaVersion {
    type Err = OrcidError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_loose(s)
            .ok_or_else(|| OrcidError::Config(format!("unsupported ORCID API version: {:?}", s)))
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `orcid-profile.orcid-bio`
pub fn bio_path() -> Path {
    Path::from(["orcid-profile", "orcid-bio"])
}

/// `orcid-profile.orcid-bio.personal-details`
pub fn personal_details_path() -> Path {
    bio_path().join(["personal-details"])
}

/// `orcid-profile.orcid-activities.orcid-works`
pub fn works_path() -> Path {
    Path::from(["orcid-profile", "orcid-activities", "orcid-works"])
}

/// `orcid-search-results`
pub fn search_results_path() -> Path {
    Path::from(["orcid-search-results"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::resolve;
    use serde_json::json;

    #[test]
    fn test_parse_versions() {
        assert_eq!(SchemaVersion::from_str_loose("1.1"), Some(SchemaVersion::V1_1));
        assert_eq!(SchemaVersion::from_str_loose(" V1.2 "), Some(SchemaVersion::V1_2));
        assert_eq!(SchemaVersion::from_str_loose("2.0"), None);
        assert!(matches!("3".parse::<SchemaVersion>(), Err(OrcidError::Config(_))));
        assert_eq!(SchemaVersion::default().to_string(), "1.2");
    }

    #[test]
    fn test_orcid_path_per_version() {
        let legacy = json!({"orcid-profile": {"orcid": {"value": "0000-0001"}}});
        let current = json!({"orcid-profile": {"orcid-identifier": {"path": "0000-0002"}}});

        assert_eq!(
            resolve(&legacy, &SchemaVersion::V1_1.orcid_path()).as_str(),
            Some("0000-0001")
        );
        assert!(resolve(&legacy, &SchemaVersion::V1_2.orcid_path()).is_missing());
        assert_eq!(
            resolve(&current, &SchemaVersion::V1_2.orcid_path()).as_str(),
            Some("0000-0002")
        );
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(
            personal_details_path().to_string(),
            "/orcid-profile/orcid-bio/personal-details"
        );
        assert_eq!(works_path().len(), 3);
    }
}
