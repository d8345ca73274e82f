//! CycloneDX 1.5 document structures.
//!
//! Serde mirrors of the JSON shape: camelCase fields, optional fields
//! omitted when absent. `Deserialize` is derived as well so emitted
//! documents can be re-parsed for verification.

use serde::{Deserialize, Serialize};

/// Fixed `bomFormat` identifier
pub const BOM_FORMAT: &str = "CycloneDX";
/// Fixed CycloneDX `specVersion` value
pub const SPEC_VERSION: &str = "1.5";
/// Property name carrying a provenance tag
pub const SOURCE_PROPERTY: &str = "pysbom:source";
/// Property name carrying the optional transitive-closure listing
pub const CLOSURE_PROPERTY: &str = "pysbom:closure";

/// Top-level SBOM document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbomDocument {
    pub bom_format: String,
    pub spec_version: String,
    pub serial_number: String,
    pub version: u32,
    pub metadata: Metadata,
    pub components: Vec<ComponentEntry>,
    pub dependencies: Vec<DependencyEntry>,
}

/// Document metadata block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Capture timestamp, RFC 3339 / `YYYY-MM-DDTHH:MM:SSZ`
    pub timestamp: String,
    pub tools: Tools,
    /// Main component: the project itself
    pub component: ComponentEntry,
}

/// Generating-tool identity (CycloneDX 1.5 `tools.components` shape)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tools {
    pub components: Vec<ToolComponent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolComponent {
    #[serde(rename = "type")]
    pub component_type: String,
    pub name: String,
    pub version: String,
}

/// One component descriptor (main or library)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(rename = "bom-ref", default, skip_serializing_if = "Option::is_none")]
    pub bom_ref: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
}

/// Key-value property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// One dependency adjacency: the ref's direct edges
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEntry {
    #[serde(rename = "ref")]
    pub dependency_ref: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl SbomDocument {
    /// Direct-edge total across the dependencies section
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.dependencies.iter().map(|d| d.depends_on.len()).sum()
    }
}
