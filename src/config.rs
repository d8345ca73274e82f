//! Generation configuration.
//!
//! Assembled from CLI arguments in `main.rs`, validated before the pipeline
//! runs. Explicitly-given paths must exist (a typo'd override is a config
//! error); defaulted paths are probed and may legitimately be absent
//! (missing optional sources degrade, they don't fail).

use crate::error::{Result, SbomGenError};
use std::path::PathBuf;

/// Configuration for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Project directory holding `pyproject.toml` / `poetry.lock`
    pub project_dir: PathBuf,
    /// Explicit site-packages directory; `None` means probe the project venv
    pub site_packages: Option<PathBuf>,
    /// Explicit frozen-listing file; `None` means `<project>/requirements.txt`
    pub freeze_file: Option<PathBuf>,
    /// Output path; `-` means stdout
    pub output: PathBuf,
    /// Pretty-print the JSON output
    pub pretty: bool,
    /// Emit per-component transitive-closure properties
    pub emit_closure: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            site_packages: None,
            freeze_file: None,
            output: PathBuf::from("sbom.json"),
            pretty: true,
            emit_closure: false,
        }
    }
}

impl GenerateConfig {
    /// Validate the configuration.
    ///
    /// The project directory must exist; explicitly-supplied source paths
    /// must exist too. Defaulted sources are allowed to be absent.
    pub fn validate(&self) -> Result<()> {
        if !self.project_dir.is_dir() {
            return Err(SbomGenError::config(format!(
                "project directory does not exist: {}",
                self.project_dir.display()
            )));
        }
        if let Some(site_packages) = &self.site_packages {
            if !site_packages.is_dir() {
                return Err(SbomGenError::config(format!(
                    "site-packages directory does not exist: {}",
                    site_packages.display()
                )));
            }
        }
        if let Some(freeze_file) = &self.freeze_file {
            if !freeze_file.is_file() {
                return Err(SbomGenError::config(format!(
                    "freeze listing does not exist: {}",
                    freeze_file.display()
                )));
            }
        }
        Ok(())
    }

    /// Effective freeze-listing path
    #[must_use]
    pub fn freeze_path(&self) -> PathBuf {
        self.freeze_file
            .clone()
            .unwrap_or_else(|| self.project_dir.join("requirements.txt"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates_in_cwd() {
        let config = GenerateConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_project_dir_is_config_error() {
        let config = GenerateConfig {
            project_dir: PathBuf::from("/nonexistent/project"),
            ..Default::default()
        };
        match config.validate() {
            Err(SbomGenError::Config(msg)) => assert!(msg.contains("/nonexistent/project")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn explicit_missing_freeze_file_is_config_error() {
        let config = GenerateConfig {
            freeze_file: Some(PathBuf::from("/nonexistent/requirements.txt")),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn freeze_path_defaults_under_project_dir() {
        let config = GenerateConfig {
            project_dir: PathBuf::from("/proj"),
            ..Default::default()
        };
        assert_eq!(config.freeze_path(), PathBuf::from("/proj/requirements.txt"));
    }
}
