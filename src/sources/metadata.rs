//! Installed distribution metadata reader.
//!
//! Enumerates `*.dist-info` directories under a site-packages directory and
//! reads each distribution's `METADATA` file (RFC 822-style headers:
//! `Name`, `Version`, `Requires-Dist`). This is the most authoritative
//! source — it reflects what is actually import-able.

use super::PackageReader;
use crate::error::{ErrorContext, Result, SbomGenError};
use crate::model::{PackageRecord, Provenance, RequirementSpec};
use std::path::{Path, PathBuf};

/// Reader over a site-packages directory.
pub struct DistMetadataReader {
    site_packages: Option<PathBuf>,
}

impl DistMetadataReader {
    /// Create a reader; `None` means no environment was discovered.
    #[must_use]
    pub fn new(site_packages: Option<PathBuf>) -> Self {
        Self { site_packages }
    }

    fn read_dist_info(&self, dir: &Path) -> Result<Option<PackageRecord>> {
        let metadata_path = dir.join("METADATA");
        if !metadata_path.is_file() {
            tracing::warn!(path = %dir.display(), "dist-info directory without METADATA, skipping");
            return Ok(None);
        }
        let content = std::fs::read_to_string(&metadata_path)
            .map_err(|e| SbomGenError::io(&metadata_path, e))
            .with_context(|| format!("reading {}", metadata_path.display()))?;
        Ok(parse_metadata(&content, dir))
    }
}

impl PackageReader for DistMetadataReader {
    fn provenance(&self) -> Provenance {
        Provenance::DistMetadata
    }

    fn read(&self) -> Result<Vec<PackageRecord>> {
        let Some(root) = self.site_packages.as_deref() else {
            tracing::debug!("no site-packages directory discovered, skipping dist metadata");
            return Ok(Vec::new());
        };
        if !root.is_dir() {
            tracing::debug!(path = %root.display(), "site-packages directory absent, skipping");
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        let entries =
            std::fs::read_dir(root).map_err(|e| SbomGenError::io(root, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| SbomGenError::io(root, e))?;
            let path = entry.path();
            let is_dist_info = path.is_dir()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(".dist-info"));
            if !is_dist_info {
                continue;
            }
            if let Some(record) = self.read_dist_info(&path)? {
                records.push(record);
            }
        }

        // read_dir order is platform-dependent; sort for determinism
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }
}

/// Parse one METADATA file into a record.
///
/// Headers end at the first blank line (the body is the package readme).
/// Returns `None` when Name or Version is missing — the directory is then
/// skipped with a warning rather than failing the run.
fn parse_metadata(content: &str, dir: &Path) -> Option<PackageRecord> {
    let mut name = None;
    let mut version = None;
    let mut requires = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            break;
        }
        if let Some(value) = line.strip_prefix("Name:") {
            name = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Version:") {
            version = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Requires-Dist:") {
            requires.push(RequirementSpec::parse(value));
        }
    }

    match (name, version) {
        (Some(name), Some(version)) => Some(
            PackageRecord::new(&name, &version, Provenance::DistMetadata).with_requires(requires),
        ),
        _ => {
            tracing::warn!(
                path = %dir.display(),
                "METADATA missing Name or Version header, skipping distribution"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUESTS_METADATA: &str = "\
Metadata-Version: 2.1
Name: requests
Version: 2.31.0
Summary: Python HTTP for Humans.
Requires-Dist: charset-normalizer (<4,>=2)
Requires-Dist: idna (<4,>=2.5)
Requires-Dist: urllib3 (<3,>=1.21.1)
Requires-Dist: PySocks (!=1.5.7,>=1.5.6) ; extra == 'socks'

Requests is an elegant HTTP library.
Requires-Dist: not-a-real-header-after-body
";

    #[test]
    fn parses_name_version_and_requirements() {
        let record =
            parse_metadata(REQUESTS_METADATA, Path::new("requests-2.31.0.dist-info")).unwrap();
        assert_eq!(record.name, "requests");
        assert_eq!(record.version, "2.31.0");
        assert_eq!(record.requires.len(), 4);
        assert_eq!(record.requires[0].name, "charset-normalizer");
        assert_eq!(record.requires[0].specifier.as_deref(), Some("<4,>=2"));
        assert_eq!(record.requires[3].name, "pysocks");
        assert_eq!(record.requires[3].marker.as_deref(), Some("extra == 'socks'"));
    }

    #[test]
    fn headers_stop_at_blank_line() {
        let record =
            parse_metadata(REQUESTS_METADATA, Path::new("requests-2.31.0.dist-info")).unwrap();
        assert!(
            !record.requires.iter().any(|r| r.name.contains("not-a-real")),
            "body lines must not be parsed as headers"
        );
    }

    #[test]
    fn missing_version_skips_distribution() {
        let content = "Metadata-Version: 2.1\nName: broken\n";
        assert!(parse_metadata(content, Path::new("broken.dist-info")).is_none());
    }

    #[test]
    fn reader_tolerates_missing_directory() {
        let reader = DistMetadataReader::new(Some(PathBuf::from("/nonexistent/site-packages")));
        assert!(reader.read().unwrap().is_empty());

        let reader = DistMetadataReader::new(None);
        assert!(reader.read().unwrap().is_empty());
    }

    #[test]
    fn reader_scans_dist_info_directories() {
        let dir = tempfile::tempdir().unwrap();
        let dist = dir.path().join("idna-3.6.dist-info");
        std::fs::create_dir(&dist).unwrap();
        std::fs::write(
            dist.join("METADATA"),
            "Metadata-Version: 2.1\nName: idna\nVersion: 3.6\n",
        )
        .unwrap();
        // Non dist-info entries are ignored
        std::fs::create_dir(dir.path().join("idna")).unwrap();
        std::fs::write(dir.path().join("six.py"), "").unwrap();

        let reader = DistMetadataReader::new(Some(dir.path().to_path_buf()));
        let records = reader.read().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "idna");
        assert_eq!(records[0].version, "3.6");
        assert_eq!(records[0].source, Provenance::DistMetadata);
    }
}
