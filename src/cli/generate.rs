//! The `generate` command: run the pipeline and persist the document.

use crate::assemble::RunContext;
use crate::config::GenerateConfig;
use crate::error::Result;
use crate::pipeline::{self, OutputTarget};

/// Generate an SBOM for the configured project and write it out.
pub fn run_generate(config: &GenerateConfig) -> Result<()> {
    config.validate()?;

    let ctx = RunContext::generate();
    let outcome = pipeline::run(config, &ctx)?;

    tracing::info!(
        components = outcome.document.components.len(),
        catalog_entries = outcome.catalog.len(),
        closures = outcome.closure.len(),
        "generation complete"
    );

    let target = OutputTarget::from_path(&config.output);
    pipeline::write_document(&outcome.document, &target, config.pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn generate_end_to_end_writes_document() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("pyproject.toml"),
            "[project]\nname = \"demo\"\nversion = \"1.0.0\"\ndependencies = [\"idna\"]\n",
        )
        .unwrap();
        fs::write(dir.path().join("requirements.txt"), "idna==3.6\n").unwrap();

        let output = dir.path().join("out/sbom.json");
        fs::create_dir(dir.path().join("out")).unwrap();
        let config = GenerateConfig {
            project_dir: dir.path().to_path_buf(),
            output: output.clone(),
            ..Default::default()
        };

        run_generate(&config).unwrap();

        let written = fs::read_to_string(output).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["bomFormat"], "CycloneDX");
        assert_eq!(parsed["metadata"]["component"]["name"], "demo");
    }

    #[test]
    fn generate_without_manifest_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerateConfig {
            project_dir: dir.path().to_path_buf(),
            output: dir.path().join("sbom.json"),
            ..Default::default()
        };
        assert!(run_generate(&config).is_err());
    }
}
