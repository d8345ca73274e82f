//! Pipeline orchestration: discover → read → merge → resolve → assemble.
//!
//! Each stage consumes the immutable product of the previous one. The
//! pipeline itself performs no writes; [`write_document`] is the single
//! output side effect, kept separate so `run` stays a pure function of its
//! inputs (modulo the injected [`RunContext`]).

use crate::assemble::{Assembler, RunContext, SbomDocument};
use crate::config::GenerateConfig;
use crate::error::{ErrorContext, Result, SbomGenError};
use crate::merge::merge_records;
use crate::model::{Catalog, DependencyClosure};
use crate::resolve::compute_closure;
use crate::sources::{
    read_all, DistMetadataReader, FreezeReader, ManifestReader, PackageReader,
};
use std::io::Write as _;
use std::path::{Path, PathBuf};

/// Exit codes for CI integration
pub mod exit_codes {
    /// Document generated and written
    pub const SUCCESS: i32 = 0;
    /// Unrecoverable read/parse/write failure
    pub const ERROR: i32 = 1;
}

/// Where the document goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// `-` selects stdout, anything else is a file path
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Self::Stdout
        } else {
            Self::File(path.to_path_buf())
        }
    }
}

/// Everything a run produces. The catalog and closure are internal data
/// products, surfaced for verification and tests; only the document is
/// persisted.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub document: SbomDocument,
    pub catalog: Catalog,
    pub closure: DependencyClosure,
}

/// Run the discovery-merge-resolve-assemble pipeline.
pub fn run(config: &GenerateConfig, ctx: &RunContext) -> Result<PipelineOutcome> {
    let manifest_reader = ManifestReader::new(config.project_dir.clone());
    let manifest = manifest_reader.load_project()?;
    tracing::info!(project = %manifest.name, version = %manifest.version, "read project manifest");

    let site_packages = config
        .site_packages
        .clone()
        .or_else(|| probe_site_packages(&config.project_dir));
    let dist_reader = DistMetadataReader::new(site_packages);
    let freeze_reader = FreezeReader::new(config.freeze_path());

    let readers: [&dyn PackageReader; 3] = [&dist_reader, &freeze_reader, &manifest_reader];
    let records = read_all(&readers)?;

    let catalog = merge_records(records);
    let closure = compute_closure(&catalog);

    let document = Assembler::new()
        .with_closure_property(config.emit_closure)
        .assemble(&catalog, &closure, &manifest, ctx);

    Ok(PipelineOutcome {
        document,
        catalog,
        closure,
    })
}

/// Serialize and persist the document. Failure here is fatal — an output
/// that cannot be written makes the run meaningless.
pub fn write_document(
    document: &SbomDocument,
    target: &OutputTarget,
    pretty: bool,
) -> Result<()> {
    let mut json = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    json.push('\n');

    match target {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(json.as_bytes())
                .context("writing document to stdout")?;
        }
        OutputTarget::File(path) => {
            std::fs::write(path, json).map_err(|e| SbomGenError::io(path, e))?;
            tracing::info!(path = %path.display(), "wrote SBOM document");
        }
    }
    Ok(())
}

/// Probe for a virtual environment's site-packages directory.
///
/// Checks `$VIRTUAL_ENV` first, then `<project>/.venv`, looking for
/// `lib/python*/site-packages` under either root. Returns `None` when no
/// environment is found; the dist-metadata source then degrades to empty.
#[must_use]
pub fn probe_site_packages(project_dir: &Path) -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(venv) = std::env::var("VIRTUAL_ENV") {
        roots.push(PathBuf::from(venv));
    }
    roots.push(project_dir.join(".venv"));

    roots.iter().find_map(|root| find_site_packages(root))
}

/// Look for `lib/python*/site-packages` under an environment root.
fn find_site_packages(env_root: &Path) -> Option<PathBuf> {
    let lib = env_root.join("lib");
    let entries = std::fs::read_dir(&lib).ok()?;
    for entry in entries.flatten() {
        let is_python_dir = entry
            .file_name()
            .to_str()
            .is_some_and(|n| n.starts_with("python"));
        if !is_python_dir {
            continue;
        }
        let candidate = entry.path().join("site-packages");
        if candidate.is_dir() {
            tracing::debug!(path = %candidate.display(), "probed site-packages");
            return Some(candidate);
        }
    }
    None
}
