//! Package discovery sources.
//!
//! Three independent readers produce raw [`PackageRecord`]s, one per
//! provenance: installed distribution metadata, a frozen requirements
//! listing, and the project manifest/lockfile. Each reader degrades to an
//! empty sequence when its designated input is absent — a missing optional
//! source never fails the run.

mod freeze;
mod lockfile;
mod metadata;

pub use freeze::FreezeReader;
pub use lockfile::{ManifestReader, ProjectManifest};
pub use metadata::DistMetadataReader;

use crate::error::Result;
use crate::model::{PackageRecord, Provenance};

/// A discovery source that can enumerate installed packages.
pub trait PackageReader {
    /// Provenance tag attached to every record this reader produces
    fn provenance(&self) -> Provenance;

    /// Read all package records from this source.
    ///
    /// Absent input yields `Ok(vec![])`; only genuinely unexpected
    /// conditions (e.g. an unreadable file that exists) are errors.
    fn read(&self) -> Result<Vec<PackageRecord>>;
}

/// Read every source in order and concatenate the records.
///
/// Reader order is significant only for catalog insertion order (and thus
/// component ordering in the document); version selection is governed by
/// source authority in the merger, not read order.
pub fn read_all(readers: &[&dyn PackageReader]) -> Result<Vec<PackageRecord>> {
    let mut records = Vec::new();
    for reader in readers {
        let batch = reader.read()?;
        tracing::info!(
            source = %reader.provenance(),
            count = batch.len(),
            "read package records"
        );
        records.extend(batch);
    }
    Ok(records)
}
