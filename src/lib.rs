//! **Generate CycloneDX SBOMs for Python project environments.**
//!
//! `pysbom` inspects a Python project from several independent vantage
//! points — installed distribution metadata, a frozen requirements listing,
//! and the `pyproject.toml` / `poetry.lock` pair — and merges what it finds
//! into a single CycloneDX 1.5 JSON document with per-component provenance.
//!
//! ## Pipeline
//!
//! Generation is a straight-line pipeline over immutable data products:
//!
//! 1. **[`sources`]** — each [`sources::PackageReader`] enumerates raw
//!    [`model::PackageRecord`]s from one source; missing optional sources
//!    degrade to empty rather than failing the run.
//! 2. **[`merge`]** — records collapse into a [`model::Catalog`], one entry
//!    per normalized package name, versions selected by source authority
//!    (installed metadata over lockfile over freeze listing).
//! 3. **[`resolve`]** — the transitive [`model::DependencyClosure`] of every
//!    cataloged package, cycle-safe and self-excluding.
//! 4. **[`assemble`]** — a pure construction of the CycloneDX object graph;
//!    run-scoped identity (timestamp, serial number) is injected via
//!    [`assemble::RunContext`] so output is fully deterministic in tests.
//!
//! [`pipeline::run`] wires the stages together; the `pysbom` binary is a
//! thin clap front-end over [`cli::run_generate`].

// Prefer explicit error propagation over unwrap() in library code
#![warn(clippy::unwrap_used)]
#![allow(
    // # Errors / # Panics doc sections are aspirational for internal APIs
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Record/entry names like `req`/`ref` read fine in context
    clippy::similar_names
)]

pub mod assemble;
pub mod cli;
pub mod config;
pub mod error;
pub mod merge;
pub mod model;
pub mod pipeline;
pub mod resolve;
pub mod sources;

pub use assemble::{Assembler, RunContext, SbomDocument};
pub use config::GenerateConfig;
pub use error::{Result, SbomGenError};
pub use merge::merge_records;
pub use model::{Catalog, DependencyClosure, PackageRecord, Provenance};
pub use resolve::compute_closure;
