//! Package manifest synthesis
//!
//! This module provides:
//! - `ManifestOptions`, assembled from configuration defaults and the request flags
//! - The `ManifestSynthesizer` seam the orchestrator writes the manifest through
//! - `PackageJsonWriter`, the default synthesizer (writes `package.json`, installs with npm)

pub mod package;
pub mod version;

use crate::config::ScaffoldConfig;
use crate::scaffold::ScaffoldRequest;
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub use package::{split_package_spec, PackageJson, PackageJsonWriter};

/// Metadata fields that may be edited interactively
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFields {
    pub description: String,
    pub version: String,
    pub author: String,
    pub license: String,
    pub keywords: Vec<String>,
}

/// Everything needed to write one package manifest
#[derive(Debug, Clone)]
pub struct ManifestOptions {
    pub name: String,
    pub directory: PathBuf,
    pub fields: ManifestFields,
    pub main: String,
    pub module_type: String,
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
    pub scripts: BTreeMap<String, String>,
    /// Ask the operator for the editable fields before writing
    pub prompt: bool,
    /// Install dependencies after writing
    pub install: bool,
}

impl ManifestOptions {
    /// Merge configuration defaults with the request's feature flags
    pub fn assemble(config: &ScaffoldConfig, request: &ScaffoldRequest, product_name: &str) -> Self {
        let options = &config.options;

        let mut dependencies = config.dependencies.clone();
        if request.with_fetch {
            dependencies.extend(config.extra_deps.fetch.iter().cloned());
        }
        if request.with_docker {
            dependencies.extend(config.extra_deps.docker.iter().cloned());
        }

        let mut dev_dependencies = config.dev_dependencies.clone();
        if request.with_commitlint {
            dev_dependencies.extend(config.extra_deps.commitlint.iter().cloned());
        }

        let mut scripts = options.scripts.clone();
        if !request.with_commitlint {
            scripts.extend(
                config
                    .extra_options
                    .commitlint_fallback
                    .scripts
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }

        Self {
            name: request.project_name(),
            directory: request.directory.clone(),
            fields: ManifestFields {
                description: format!("Project created with {}", product_name),
                version: options.version.clone(),
                author: options.author.clone(),
                license: options.license.clone(),
                keywords: options.keywords.clone(),
            },
            main: options.main.clone(),
            module_type: options.module_type.clone(),
            dependencies,
            dev_dependencies,
            scripts,
            prompt: !request.silent,
            install: options.install,
        }
    }
}

/// Writes a package manifest into the project directory
#[allow(async_fn_in_trait)]
pub trait ManifestSynthesizer {
    async fn synthesize(&self, options: &ManifestOptions) -> Result<()>;
}
