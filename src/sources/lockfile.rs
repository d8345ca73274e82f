//! Project manifest and lockfile reader.
//!
//! Reads `pyproject.toml` (PEP 621 `[project]` tables and the Poetry
//! `[tool.poetry]` layout, including dev-dependency groups) plus the
//! companion `poetry.lock`. Locked packages carry exact versions; declared
//! dependencies attest presence only. Besides package records this reader
//! exposes the [`ProjectManifest`] — the project's own identity and its
//! declared direct dependencies — which the assembler needs for the main
//! component.

use super::PackageReader;
use crate::error::{AssembleErrorKind, ErrorContext, Result, SbomGenError};
use crate::model::{normalize_name, PackageRecord, Provenance, RequirementSpec};
use indexmap::IndexMap;
use std::path::PathBuf;

/// Default project name when `pyproject.toml` omits one
pub const DEFAULT_PROJECT_NAME: &str = "unnamed-project";
/// Default project version when `pyproject.toml` omits one
pub const DEFAULT_PROJECT_VERSION: &str = "0.1.0";

/// The project's own identity, read from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifest {
    /// Normalized project name
    pub name: String,
    /// Project version
    pub version: String,
    /// Normalized names of the declared direct dependencies, in declaration order
    pub direct_deps: Vec<String>,
}

/// Reader over a project directory's manifest and lock artifact.
pub struct ManifestReader {
    project_dir: PathBuf,
}

impl ManifestReader {
    /// Create a reader rooted at the project directory
    #[must_use]
    pub fn new(project_dir: PathBuf) -> Self {
        Self { project_dir }
    }

    fn pyproject_path(&self) -> PathBuf {
        self.project_dir.join("pyproject.toml")
    }

    fn poetry_lock_path(&self) -> PathBuf {
        self.project_dir.join("poetry.lock")
    }

    /// Load the project's identity and declared direct dependencies.
    ///
    /// A missing or unreadable `pyproject.toml` is fatal here — without it
    /// there is no project identity and the output would be meaningless.
    /// Missing `name`/`version` fields inside an existing manifest fall back
    /// to defaults.
    pub fn load_project(&self) -> Result<ProjectManifest> {
        let path = self.pyproject_path();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            SbomGenError::assemble(
                "project manifest is required for the main component",
                AssembleErrorKind::MissingProjectIdentity(format!("{}: {e}", path.display())),
            )
        })?;
        let doc: toml::Value = content
            .parse()
            .with_context(|| format!("parsing {}", path.display()))?;

        let project = doc.get("project");
        let poetry = doc.get("tool").and_then(|t| t.get("poetry"));

        let name = project
            .and_then(|p| p.get("name"))
            .or_else(|| poetry.and_then(|p| p.get("name")))
            .and_then(toml::Value::as_str)
            .unwrap_or(DEFAULT_PROJECT_NAME);
        let version = project
            .and_then(|p| p.get("version"))
            .or_else(|| poetry.and_then(|p| p.get("version")))
            .and_then(toml::Value::as_str)
            .unwrap_or(DEFAULT_PROJECT_VERSION);

        let mut direct_deps = Vec::new();
        for req in pep621_requirements(project) {
            push_unique(&mut direct_deps, req.name);
        }
        if let Some(table) = poetry.and_then(|p| p.get("dependencies")).and_then(toml::Value::as_table) {
            for dep_name in table.keys() {
                push_unique(&mut direct_deps, normalize_name(dep_name));
            }
        }

        Ok(ProjectManifest {
            name: normalize_name(name),
            version: version.to_string(),
            direct_deps,
        })
    }
}

impl PackageReader for ManifestReader {
    fn provenance(&self) -> Provenance {
        Provenance::Lockfile
    }

    fn read(&self) -> Result<Vec<PackageRecord>> {
        // Keyed map so a locked exact version replaces a declared-only record
        let mut records: IndexMap<String, PackageRecord> = IndexMap::new();

        let pyproject_path = self.pyproject_path();
        if pyproject_path.is_file() {
            let content = std::fs::read_to_string(&pyproject_path)
                .map_err(|e| SbomGenError::io(&pyproject_path, e))?;
            let doc: toml::Value = content
                .parse()
                .with_context(|| format!("parsing {}", pyproject_path.display()))?;

            for req in declared_dependencies(&doc) {
                records
                    .entry(req.name.clone())
                    .or_insert_with(|| PackageRecord::new(&req.name, "", Provenance::Lockfile));
            }
        } else {
            tracing::debug!(path = %pyproject_path.display(), "pyproject.toml absent, skipping");
        }

        let lock_path = self.poetry_lock_path();
        if lock_path.is_file() {
            let content = std::fs::read_to_string(&lock_path)
                .map_err(|e| SbomGenError::io(&lock_path, e))?;
            let doc: toml::Value = content
                .parse()
                .with_context(|| format!("parsing {}", lock_path.display()))?;

            for (name, version) in locked_packages(&doc) {
                let record = PackageRecord::new(&name, &version, Provenance::Lockfile);
                records.insert(record.name.clone(), record);
            }
        } else {
            tracing::debug!(path = %lock_path.display(), "poetry.lock absent, skipping");
        }

        Ok(records.into_values().collect())
    }
}

fn push_unique(deps: &mut Vec<String>, name: String) {
    if name != "python" && !deps.contains(&name) {
        deps.push(name);
    }
}

/// PEP 621 `[project] dependencies` requirement strings
fn pep621_requirements(project: Option<&toml::Value>) -> Vec<RequirementSpec> {
    project
        .and_then(|p| p.get("dependencies"))
        .and_then(toml::Value::as_array)
        .map(|deps| {
            deps.iter()
                .filter_map(toml::Value::as_str)
                .map(RequirementSpec::parse)
                .collect()
        })
        .unwrap_or_default()
}

/// Every dependency declared anywhere in the manifest: PEP 621 plus the
/// Poetry main table, legacy `dev-dependencies`, and modern dependency
/// groups. The interpreter constraint (`python`) is environment, not a
/// dependency, and is excluded.
fn declared_dependencies(doc: &toml::Value) -> Vec<RequirementSpec> {
    let mut reqs: Vec<RequirementSpec> = pep621_requirements(doc.get("project"));

    let poetry = doc.get("tool").and_then(|t| t.get("poetry"));
    let mut poetry_tables = Vec::new();
    poetry_tables.push(poetry.and_then(|p| p.get("dependencies")));
    poetry_tables.push(poetry.and_then(|p| p.get("dev-dependencies")));
    if let Some(groups) = poetry
        .and_then(|p| p.get("group"))
        .and_then(toml::Value::as_table)
    {
        for group in groups.values() {
            poetry_tables.push(group.get("dependencies"));
        }
    }

    for table in poetry_tables.into_iter().flatten() {
        if let Some(table) = table.as_table() {
            for name in table.keys() {
                reqs.push(RequirementSpec::named(name));
            }
        }
    }

    reqs.retain(|r| r.name != "python");
    reqs
}

/// `[[package]]` entries from poetry.lock: (name, exact version)
fn locked_packages(doc: &toml::Value) -> Vec<(String, String)> {
    doc.get("package")
        .and_then(toml::Value::as_array)
        .map(|packages| {
            packages
                .iter()
                .filter_map(|pkg| {
                    let name = pkg.get("name").and_then(toml::Value::as_str)?;
                    let version = pkg.get("version").and_then(toml::Value::as_str)?;
                    Some((name.to_string(), version.to_string()))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const PEP621_MANIFEST: &str = r#"
[project]
name = "Demo.App"
version = "1.2.3"
dependencies = [
    "requests>=2.31.0",
    "beautifulsoup4==4.12.3",
    "lxml",
]
"#;

    const POETRY_MANIFEST: &str = r#"
[tool.poetry]
name = "demo-app"
version = "0.9.0"

[tool.poetry.dependencies]
python = "^3.11"
requests = "^2.31"
toml = { version = "^0.10", optional = true }

[tool.poetry.dev-dependencies]
pytest = "^7.0"

[tool.poetry.group.lint.dependencies]
ruff = "^0.4"
"#;

    const POETRY_LOCK: &str = r#"
[[package]]
name = "requests"
version = "2.31.0"

[[package]]
name = "Charset_Normalizer"
version = "3.3.2"
"#;

    fn project_with(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn load_project_reads_pep621_identity() {
        let dir = project_with(&[("pyproject.toml", PEP621_MANIFEST)]);
        let manifest = ManifestReader::new(dir.path().to_path_buf())
            .load_project()
            .unwrap();
        assert_eq!(manifest.name, "demo-app");
        assert_eq!(manifest.version, "1.2.3");
        assert_eq!(
            manifest.direct_deps,
            vec!["requests", "beautifulsoup4", "lxml"]
        );
    }

    #[test]
    fn load_project_reads_poetry_identity_and_excludes_python() {
        let dir = project_with(&[("pyproject.toml", POETRY_MANIFEST)]);
        let manifest = ManifestReader::new(dir.path().to_path_buf())
            .load_project()
            .unwrap();
        assert_eq!(manifest.name, "demo-app");
        assert_eq!(manifest.version, "0.9.0");
        assert!(manifest.direct_deps.contains(&"requests".to_string()));
        assert!(!manifest.direct_deps.contains(&"python".to_string()));
        // dev groups are not *direct* deps of the main component
        assert!(!manifest.direct_deps.contains(&"pytest".to_string()));
    }

    #[test]
    fn load_project_missing_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = ManifestReader::new(dir.path().to_path_buf()).load_project();
        match result {
            Err(SbomGenError::Assemble {
                source: AssembleErrorKind::MissingProjectIdentity(detail),
                ..
            }) => assert!(detail.contains("pyproject.toml"), "detail: {detail}"),
            other => panic!("expected MissingProjectIdentity, got {other:?}"),
        }
    }

    #[test]
    fn load_project_missing_fields_fall_back_to_defaults() {
        let dir = project_with(&[("pyproject.toml", "[project]\n")]);
        let manifest = ManifestReader::new(dir.path().to_path_buf())
            .load_project()
            .unwrap();
        assert_eq!(manifest.name, DEFAULT_PROJECT_NAME);
        assert_eq!(manifest.version, DEFAULT_PROJECT_VERSION);
    }

    #[test]
    fn read_merges_declared_and_locked() {
        let dir = project_with(&[
            ("pyproject.toml", POETRY_MANIFEST),
            ("poetry.lock", POETRY_LOCK),
        ]);
        let records = ManifestReader::new(dir.path().to_path_buf()).read().unwrap();

        let requests = records.iter().find(|r| r.name == "requests").unwrap();
        assert_eq!(requests.version, "2.31.0", "lock pin wins over constraint");
        assert_eq!(requests.source, Provenance::Lockfile);

        let normalizer = records
            .iter()
            .find(|r| r.name == "charset-normalizer")
            .unwrap();
        assert_eq!(normalizer.version, "3.3.2");

        let pytest = records.iter().find(|r| r.name == "pytest").unwrap();
        assert_eq!(pytest.version, "", "declared-only deps attest presence");

        assert!(records.iter().any(|r| r.name == "ruff"), "group deps read");
        assert!(!records.iter().any(|r| r.name == "python"));
    }

    #[test]
    fn read_with_no_files_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let records = ManifestReader::new(dir.path().to_path_buf()).read().unwrap();
        assert!(records.is_empty());
    }
}
