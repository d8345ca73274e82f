//! Core data model for package discovery and merging.
//!
//! Raw per-source observations ([`PackageRecord`]) are normalized into a
//! canonical [`Catalog`] keyed by normalized package name, from which the
//! resolver derives a [`DependencyClosure`]. All comparisons and lookups use
//! the normalized name form produced by [`normalize_name`].

mod catalog;
mod closure;
mod record;

pub use catalog::{Catalog, CatalogEntry};
pub use closure::DependencyClosure;
pub use record::{normalize_name, PackageRecord, Provenance, RequirementSpec};
