//! Frozen requirements listing reader.
//!
//! Parses `pip freeze`-style text: one `name==version` per line. This
//! source attests presence and version only — it never contributes
//! requirement edges.

use super::PackageReader;
use crate::error::{Result, SbomGenError};
use crate::model::{PackageRecord, Provenance};
use std::path::PathBuf;

/// Reader over a frozen requirements file.
pub struct FreezeReader {
    path: PathBuf,
}

impl FreezeReader {
    /// Create a reader for the given listing file
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PackageReader for FreezeReader {
    fn provenance(&self) -> Provenance {
        Provenance::FreezeList
    }

    fn read(&self) -> Result<Vec<PackageRecord>> {
        if !self.path.is_file() {
            tracing::debug!(path = %self.path.display(), "freeze listing absent, skipping");
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| SbomGenError::io(&self.path, e))?;
        Ok(parse_listing(&content))
    }
}

/// Parse listing text into minimal records.
///
/// Blank lines, comments, editable installs, and lines without `==` (VCS
/// pins, `name @ url` forms) are skipped — those shapes carry no exact
/// version this source can attest.
fn parse_listing(content: &str) -> Vec<PackageRecord> {
    let mut records = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("-e ") {
            continue;
        }
        let Some((name_part, version)) = line.split_once("==") else {
            tracing::debug!(line, "freeze line without exact pin, skipping");
            continue;
        };
        // Extras don't affect identity: "requests[socks]==2.31.0"
        let name = name_part.split('[').next().unwrap_or(name_part).trim();
        if name.is_empty() {
            continue;
        }
        records.push(PackageRecord::new(name, version.trim(), Provenance::FreezeList));
    }
    records
}
