//! Transitive dependency closures.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Mapping from normalized package name to the set of normalized names
/// reachable through requirement edges, excluding the package itself.
///
/// Both the map and the sets are ordered, so the closure is a fixpoint:
/// recomputing from the same catalog yields an identical structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyClosure {
    reachable: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyClosure {
    /// Create an empty closure
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the reachable set for a package
    pub fn insert(&mut self, name: String, reachable: BTreeSet<String>) {
        self.reachable.insert(name, reachable);
    }

    /// Reachable set for a package, if computed
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.reachable.get(name)
    }

    /// Iterate (package, reachable-set) pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.reachable.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of packages with a computed closure
    #[must_use]
    pub fn len(&self) -> usize {
        self.reachable.len()
    }

    /// Whether no closures have been computed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reachable.is_empty()
    }
}
