//! The merged, canonical package catalog.

use super::{normalize_name, Provenance, RequirementSpec};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Canonical view of one package after merging all contributing records.
///
/// Invariants: the entry is keyed by its normalized `name`; `sources` is
/// never empty; `requires` holds at most one spec per normalized name, with
/// the first-seen specifier/marker text retained for traceability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Normalized package name
    pub name: String,
    /// Version chosen by source authority, empty when no source knew one
    pub version: String,
    /// Union of requirement edges across contributing records
    pub requires: Vec<RequirementSpec>,
    /// Every source that attested this package
    pub sources: BTreeSet<Provenance>,
}

impl CatalogEntry {
    /// Names of this entry's direct requirements
    pub fn direct_requires(&self) -> impl Iterator<Item = &str> {
        self.requires.iter().map(|r| r.name.as_str())
    }

    /// Add a requirement edge unless one with the same normalized name exists
    pub fn push_requirement(&mut self, req: RequirementSpec) {
        if !self.requires.iter().any(|existing| existing.name == req.name) {
            self.requires.push(req);
        }
    }

    /// The most authoritative source that contributed to this entry
    #[must_use]
    pub fn best_source(&self) -> Provenance {
        self.sources
            .iter()
            .copied()
            .min_by_key(Provenance::authority_rank)
            .unwrap_or(Provenance::FreezeList)
    }
}

/// The merged catalog: exactly one entry per normalized package name,
/// insertion-ordered for deterministic output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    entries: IndexMap<String, CatalogEntry>,
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, keyed by its normalized name
    pub fn insert(&mut self, entry: CatalogEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Look up an entry by (possibly unnormalized) name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(&normalize_name(name))
    }

    /// Mutable lookup by (possibly unnormalized) name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut CatalogEntry> {
        self.entries.get_mut(&normalize_name(name))
    }

    /// Whether an entry exists for this name
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize_name(name))
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    /// Iterate normalized names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of direct requirement edges across all entries
    #[must_use]
    pub fn direct_edge_count(&self) -> usize {
        self.entries.values().map(|e| e.requires.len()).sum()
    }
}
