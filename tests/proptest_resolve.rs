//! Property-based tests for closure resolution.
//!
//! Random small dependency graphs (including cycles and self-loops) must
//! never panic the resolver, and the resulting closures must satisfy the
//! reachability invariants regardless of graph shape.

use proptest::prelude::*;
use pysbom::model::{Catalog, PackageRecord, Provenance, RequirementSpec};
use pysbom::{compute_closure, merge_records};

/// Build a catalog from an adjacency list over packages `pkg-0..pkg-n`.
fn catalog_from_edges(edges: &[Vec<usize>]) -> Catalog {
    let records: Vec<PackageRecord> = edges
        .iter()
        .enumerate()
        .map(|(i, targets)| {
            let requires = targets
                .iter()
                .map(|t| RequirementSpec::named(&format!("pkg-{t}")))
                .collect();
            PackageRecord::new(&format!("pkg-{i}"), "1.0", Provenance::DistMetadata)
                .with_requires(requires)
        })
        .collect();
    merge_records(records)
}

/// Adjacency lists for up to 8 packages, each with up to 4 outgoing edges.
/// Targets may point past the last package (dangling requirements) and may
/// point back at the package itself (self-loops).
fn graph_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0..10usize, 0..4), 1..8)
}

proptest! {
    #[test]
    fn closure_never_contains_the_package_itself(edges in graph_strategy()) {
        let catalog = catalog_from_edges(&edges);
        let closure = compute_closure(&catalog);
        for (name, reachable) in closure.iter() {
            prop_assert!(!reachable.contains(name), "{name} reached itself");
        }
    }

    #[test]
    fn closure_is_a_superset_of_direct_requires(edges in graph_strategy()) {
        let catalog = catalog_from_edges(&edges);
        let closure = compute_closure(&catalog);
        for entry in catalog.iter() {
            let reachable = closure.get(&entry.name).expect("entry has a closure");
            for req in entry.direct_requires() {
                if req != entry.name {
                    prop_assert!(reachable.contains(req), "{} missing direct {req}", entry.name);
                }
            }
        }
    }

    #[test]
    fn reachability_is_transitive(edges in graph_strategy()) {
        let catalog = catalog_from_edges(&edges);
        let closure = compute_closure(&catalog);
        for (name, reachable) in closure.iter() {
            for mid in reachable {
                let Some(beyond) = closure.get(mid) else { continue };
                for target in beyond {
                    if target != name {
                        prop_assert!(
                            reachable.contains(target),
                            "{name} reaches {mid} and {mid} reaches {target}, but {name} does not reach {target}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn every_catalog_entry_has_a_closure(edges in graph_strategy()) {
        let catalog = catalog_from_edges(&edges);
        let closure = compute_closure(&catalog);
        prop_assert_eq!(closure.len(), catalog.len());
        for entry in catalog.iter() {
            prop_assert!(closure.get(&entry.name).is_some());
        }
    }

    #[test]
    fn resolution_is_deterministic(edges in graph_strategy()) {
        let catalog = catalog_from_edges(&edges);
        prop_assert_eq!(compute_closure(&catalog), compute_closure(&catalog));
    }
}
