//! Provenance reconciliation: raw records → canonical catalog.
//!
//! Grouping key is the normalized name. When sources disagree on the
//! version, the most authoritative contributing source wins
//! (dist-metadata > lockfile > freeze-list); requirement edges and
//! provenance tags are unioned across all contributing records.

use crate::model::{Catalog, CatalogEntry, PackageRecord};
use std::collections::BTreeSet;

/// Merge reader output into one catalog entry per normalized name.
///
/// Pure function of its input sequence; entry order is first-seen order.
#[must_use]
pub fn merge_records(records: Vec<PackageRecord>) -> Catalog {
    let mut catalog = Catalog::new();
    for record in records {
        match catalog.get_mut(&record.name) {
            Some(entry) => absorb(entry, record),
            None => catalog.insert(entry_from(record)),
        }
    }
    tracing::info!(entries = catalog.len(), "merged catalog");
    catalog
}

fn entry_from(record: PackageRecord) -> CatalogEntry {
    let mut entry = CatalogEntry {
        name: record.name,
        version: record.version,
        requires: Vec::new(),
        sources: BTreeSet::from([record.source]),
    };
    for req in record.requires {
        entry.push_requirement(req);
    }
    entry
}

/// Fold one more record into an existing entry.
fn absorb(entry: &mut CatalogEntry, record: PackageRecord) {
    let incumbent_rank = entry.best_source().authority_rank();
    let challenger_rank = record.source.authority_rank();

    // Strictly more authoritative source, or any source when the entry has
    // no version yet (declared-only manifest records attest presence only).
    if !record.version.is_empty()
        && (challenger_rank < incumbent_rank || entry.version.is_empty())
    {
        entry.version = record.version;
    }

    entry.sources.insert(record.source);
    for req in record.requires {
        entry.push_requirement(req);
    }
}
