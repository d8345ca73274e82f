//! Transitive dependency resolution.
//!
//! Depth-first traversal from each package's direct requirements, carrying a
//! per-path visited set. The per-path set (rather than one global set) lets
//! diamond shapes expand fully on every branch while a genuine cycle
//! terminates at the repeated node on that specific path. The set is cloned
//! per branch, never shared mutably, so paths cannot contaminate each other.

use crate::model::{Catalog, DependencyClosure};
use std::collections::{BTreeSet, HashSet};

/// Compute the transitive closure for every catalog entry.
///
/// A requirement name with no matching catalog entry is included as a leaf —
/// it is a real requirement that simply cannot be expanded further. Each
/// package's own name is excluded from its closure even when a cycle leads
/// back to it.
#[must_use]
pub fn compute_closure(catalog: &Catalog) -> DependencyClosure {
    let mut closure = DependencyClosure::new();
    for name in catalog.names() {
        let mut reachable = BTreeSet::new();
        let mut path = HashSet::new();
        path.insert(name.to_string());
        walk(name, catalog, &path, &mut reachable);
        reachable.remove(name);
        closure.insert(name.to_string(), reachable);
    }
    tracing::debug!(packages = closure.len(), "computed dependency closures");
    closure
}

fn walk(name: &str, catalog: &Catalog, path: &HashSet<String>, out: &mut BTreeSet<String>) {
    let Some(entry) = catalog.get(name) else {
        return;
    };
    for req in entry.direct_requires() {
        out.insert(req.to_string());
        if path.contains(req) {
            // Cycle on this path; the node is recorded but not re-expanded
            continue;
        }
        let mut next_path = path.clone();
        next_path.insert(req.to_string());
        walk(req, catalog, &next_path, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge_records;
    use crate::model::{PackageRecord, Provenance, RequirementSpec};

    fn catalog(edges: &[(&str, &[&str])]) -> Catalog {
        let records = edges
            .iter()
            .map(|(name, reqs)| {
                PackageRecord::new(name, "1.0", Provenance::DistMetadata).with_requires(
                    reqs.iter().map(|r| RequirementSpec::named(r)).collect(),
                )
            })
            .collect();
        merge_records(records)
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn closure_is_superset_of_direct_requires() {
        let catalog = catalog(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &[]), ("d", &[])]);
        let closure = compute_closure(&catalog);
        for entry in catalog.iter() {
            let reachable = closure.get(&entry.name).unwrap();
            for req in entry.direct_requires() {
                assert!(reachable.contains(req), "{} missing {req}", entry.name);
            }
        }
    }

    #[test]
    fn diamond_expands_fully_and_dedups() {
        let catalog = catalog(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &["d"]), ("d", &[])]);
        let closure = compute_closure(&catalog);
        assert_eq!(closure.get("a").unwrap(), &set(&["b", "c", "d"]));
    }

    #[test]
    fn cycle_terminates_without_self_inclusion() {
        let catalog = catalog(&[("a", &["b"]), ("b", &["a"])]);
        let closure = compute_closure(&catalog);
        assert_eq!(closure.get("a").unwrap(), &set(&["b"]));
        assert_eq!(closure.get("b").unwrap(), &set(&["a"]));
    }

    #[test]
    fn three_node_cycle_terminates() {
        let catalog = catalog(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);
        let closure = compute_closure(&catalog);
        assert_eq!(closure.get("a").unwrap(), &set(&["b", "c"]));
        assert_eq!(closure.get("b").unwrap(), &set(&["a", "c"]));
        assert_eq!(closure.get("c").unwrap(), &set(&["a", "b"]));
    }

    #[test]
    fn unknown_dependency_is_a_leaf() {
        let catalog = catalog(&[("a", &["z"])]);
        let closure = compute_closure(&catalog);
        assert_eq!(closure.get("a").unwrap(), &set(&["z"]));
    }

    #[test]
    fn deep_chain_reaches_everything() {
        let catalog = catalog(&[
            ("a", &["b"]),
            ("b", &["c"]),
            ("c", &["d"]),
            ("d", &["e"]),
            ("e", &[]),
        ]);
        let closure = compute_closure(&catalog);
        assert_eq!(closure.get("a").unwrap(), &set(&["b", "c", "d", "e"]));
        assert_eq!(closure.get("d").unwrap(), &set(&["e"]));
        assert!(closure.get("e").unwrap().is_empty());
    }

    #[test]
    fn recomputation_is_idempotent() {
        let catalog = catalog(&[("a", &["b", "c"]), ("b", &["d", "a"]), ("c", &["d"]), ("d", &[])]);
        let first = compute_closure(&catalog);
        let second = compute_closure(&catalog);
        assert_eq!(first, second);
    }
}
