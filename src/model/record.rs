//! Raw package records as observed by a single discovery source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discovery source that attested a package, ordered by authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Installed distribution metadata (`*.dist-info/METADATA`)
    DistMetadata,
    /// Project manifest and companion lockfile
    Lockfile,
    /// Frozen `name==version` requirements listing
    FreezeList,
}

impl Provenance {
    /// Authority rank for version selection (lower is more authoritative).
    ///
    /// Distribution metadata reflects what is actually import-able; the
    /// frozen listing carries no structured requirement data and ranks last.
    #[must_use]
    pub const fn authority_rank(&self) -> u8 {
        match self {
            Self::DistMetadata => 0,
            Self::Lockfile => 1,
            Self::FreezeList => 2,
        }
    }

    /// Stable tag used in emitted provenance properties
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::DistMetadata => "dist-metadata",
            Self::Lockfile => "lockfile",
            Self::FreezeList => "freeze-list",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Normalize a package name for identity comparisons.
///
/// Lowercases and folds `.` and `_` to `-`, so `Zope.Interface`,
/// `zope_interface`, and `zope-interface` all key the same catalog entry.
/// This matches pypi purl normalization.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(['.', '_'], "-")
}

/// One declared requirement edge, as parsed from a requirement string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSpec {
    /// Normalized requirement name
    pub name: String,
    /// Version specifier text (e.g. `>=4.12.0,<5`), if present
    pub specifier: Option<String>,
    /// Environment marker text (e.g. `python_version < "3.11"`), if present
    pub marker: Option<String>,
}

impl RequirementSpec {
    /// Create a bare requirement with no specifier or marker
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: normalize_name(name),
            specifier: None,
            marker: None,
        }
    }

    /// Parse a PEP 508-style requirement string.
    ///
    /// Handles `name`, `name[extras]`, `name (>=1.0)`, `name>=1.0`, and a
    /// trailing `; marker` clause. A string that cannot be split into those
    /// parts degrades to a bare requirement whose name is the normalized raw
    /// string — contributing information is never dropped.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let (head, marker) = match trimmed.split_once(';') {
            Some((h, m)) => (h.trim(), non_empty(m.trim())),
            None => (trimmed, None),
        };

        let name_end = head
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
            .unwrap_or(head.len());
        let name = &head[..name_end];
        if name.is_empty() {
            return Self::degraded(trimmed);
        }

        let mut rest = head[name_end..].trim_start();
        if let Some(stripped) = rest.strip_prefix('[') {
            // Extras clause; the extras themselves do not affect the edge
            match stripped.find(']') {
                Some(close) => rest = stripped[close + 1..].trim_start(),
                None => return Self::degraded(trimmed),
            }
        }

        let specifier = rest
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .trim();

        Self {
            name: normalize_name(name),
            specifier: non_empty(specifier),
            marker,
        }
    }

    fn degraded(raw: &str) -> Self {
        Self {
            name: normalize_name(raw),
            specifier: None,
            marker: None,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// One installed package as seen by a single source.
///
/// `version` is the exact installed version where the source knows it; a
/// source that attests presence only (or only a constraint) leaves it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Normalized package name
    pub name: String,
    /// Installed version string, empty when unknown to this source
    pub version: String,
    /// Declared direct requirements
    pub requires: Vec<RequirementSpec>,
    /// Which source produced this record
    pub source: Provenance,
}

impl PackageRecord {
    /// Create a record with no requirement edges
    #[must_use]
    pub fn new(name: &str, version: &str, source: Provenance) -> Self {
        Self {
            name: normalize_name(name),
            version: version.trim().to_string(),
            requires: Vec::new(),
            source,
        }
    }

    /// Attach requirement edges
    #[must_use]
    pub fn with_requires(mut self, requires: Vec<RequirementSpec>) -> Self {
        self.requires = requires;
        self
    }
}
