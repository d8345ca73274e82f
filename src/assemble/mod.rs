//! SBOM document assembly.
//!
//! The assembler is a pure function of the catalog, the closure, the project
//! manifest, and an injected [`RunContext`]. Run-scoped state (timestamp,
//! serial number) is generated at the call site, never inside the assembler,
//! so tests can supply fixed values and assert exact document equality.

pub mod document;

pub use document::{
    ComponentEntry, DependencyEntry, Metadata, Property, SbomDocument, ToolComponent, Tools,
};

use crate::model::{normalize_name, Catalog, CatalogEntry, DependencyClosure};
use crate::sources::ProjectManifest;
use chrono::{DateTime, SecondsFormat, Utc};

/// The runtime interpreter's normalized name; environment, not a dependency.
const RUNTIME_COMPONENT: &str = "python";

/// Run-scoped identifiers, injected into assembly.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Capture timestamp
    pub timestamp: DateTime<Utc>,
    /// URN-formatted unique serial number
    pub serial_number: String,
}

impl RunContext {
    /// Fresh context for a real run
    #[must_use]
    pub fn generate() -> Self {
        Self {
            timestamp: Utc::now(),
            serial_number: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
        }
    }

    /// Fixed context, for deterministic assembly in tests
    #[must_use]
    pub const fn fixed(timestamp: DateTime<Utc>, serial_number: String) -> Self {
        Self {
            timestamp,
            serial_number,
        }
    }
}

/// Builds the CycloneDX object graph from the pipeline's data products.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    include_closure: bool,
}

impl Assembler {
    /// Assembler with default settings (no closure property)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also emit each component's transitive closure as a property.
    ///
    /// The emitted dependency graph always encodes direct edges only;
    /// this auxiliary property exists for verification and consumers that
    /// don't want to recompute reachability.
    #[must_use]
    pub const fn with_closure_property(mut self, include: bool) -> Self {
        self.include_closure = include;
        self
    }

    /// Assemble the document.
    #[must_use]
    pub fn assemble(
        &self,
        catalog: &Catalog,
        closure: &DependencyClosure,
        manifest: &ProjectManifest,
        ctx: &RunContext,
    ) -> SbomDocument {
        // The main component uses the same purl ref form as the libraries
        let main_ref = purl(&normalize_name(&manifest.name), &manifest.version);

        let components: Vec<ComponentEntry> = catalog
            .iter()
            .filter(|entry| entry.name != RUNTIME_COMPONENT)
            .map(|entry| self.library_component(entry, closure))
            .collect();

        let mut dependencies = Vec::with_capacity(components.len() + 1);
        dependencies.push(DependencyEntry {
            dependency_ref: main_ref.clone(),
            depends_on: manifest
                .direct_deps
                .iter()
                .filter(|name| name.as_str() != RUNTIME_COMPONENT)
                .map(|name| ref_for(catalog, name))
                .collect(),
        });
        for entry in catalog.iter().filter(|e| e.name != RUNTIME_COMPONENT) {
            dependencies.push(DependencyEntry {
                dependency_ref: entry_ref(entry),
                depends_on: entry
                    .direct_requires()
                    .filter(|name| *name != RUNTIME_COMPONENT)
                    .map(|name| ref_for(catalog, name))
                    .collect(),
            });
        }

        tracing::info!(
            components = components.len(),
            edges = dependencies.iter().map(|d| d.depends_on.len()).sum::<usize>(),
            "assembled SBOM document"
        );

        SbomDocument {
            bom_format: document::BOM_FORMAT.to_string(),
            spec_version: document::SPEC_VERSION.to_string(),
            serial_number: ctx.serial_number.clone(),
            version: 1,
            metadata: Metadata {
                timestamp: ctx
                    .timestamp
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
                tools: Tools {
                    components: vec![ToolComponent {
                        component_type: "application".to_string(),
                        name: env!("CARGO_PKG_NAME").to_string(),
                        version: env!("CARGO_PKG_VERSION").to_string(),
                    }],
                },
                component: ComponentEntry {
                    component_type: "application".to_string(),
                    bom_ref: Some(main_ref.clone()),
                    name: normalize_name(&manifest.name),
                    version: Some(manifest.version.clone()),
                    purl: Some(main_ref),
                    properties: Vec::new(),
                },
            },
            components,
            dependencies,
        }
    }

    fn library_component(&self, entry: &CatalogEntry, closure: &DependencyClosure) -> ComponentEntry {
        let mut properties: Vec<Property> = entry
            .sources
            .iter()
            .map(|source| Property {
                name: document::SOURCE_PROPERTY.to_string(),
                value: source.tag().to_string(),
            })
            .collect();

        if self.include_closure {
            if let Some(reachable) = closure.get(&entry.name) {
                if !reachable.is_empty() {
                    properties.push(Property {
                        name: document::CLOSURE_PROPERTY.to_string(),
                        value: reachable.iter().cloned().collect::<Vec<_>>().join(","),
                    });
                }
            }
        }

        ComponentEntry {
            component_type: "library".to_string(),
            bom_ref: Some(entry_ref(entry)),
            name: entry.name.clone(),
            version: non_empty(&entry.version),
            purl: Some(purl(&entry.name, &entry.version)),
            properties,
        }
    }
}

/// Package-url for a pypi package; the version qualifier is omitted when the
/// catalog never learned one.
fn purl(name: &str, version: &str) -> String {
    if version.is_empty() {
        format!("pkg:pypi/{name}")
    } else {
        format!("pkg:pypi/{name}@{version}")
    }
}

fn entry_ref(entry: &CatalogEntry) -> String {
    purl(&entry.name, &entry.version)
}

/// Ref string for a requirement target: the purl when the target is
/// cataloged, otherwise the bare normalized name. Unresolvable requirements
/// stay in the graph — information is never dropped.
fn ref_for(catalog: &Catalog, name: &str) -> String {
    match catalog.get(name) {
        Some(entry) => entry_ref(entry),
        None => normalize_name(name),
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
