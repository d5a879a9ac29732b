//! `package.json` writing and dependency installation

use super::{ManifestOptions, ManifestSynthesizer};
use crate::config::Commands;
use crate::runtime::command::{CommandRunner, SystemRunner};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::fs;
use tracing::debug;

/// Version range recorded for dependencies that are not installed
const UNINSTALLED_RANGE: &str = "latest";

/// The subset of `package.json` the scaffolder writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    pub name: String,
    pub version: String,
    pub description: String,
    pub main: String,
    #[serde(rename = "type")]
    pub module_type: String,
    pub scripts: BTreeMap<String, String>,
    pub keywords: Vec<String>,
    pub author: String,
    pub license: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageJson {
    /// Build the manifest; dependencies are listed only when npm will not add them
    pub fn from_options(options: &ManifestOptions) -> Self {
        let listed = |deps: &[String]| -> BTreeMap<String, String> {
            if options.install {
                return BTreeMap::new();
            }
            deps.iter()
                .map(|spec| {
                    let (name, range) = split_package_spec(spec);
                    (name.to_string(), range.unwrap_or(UNINSTALLED_RANGE).to_string())
                })
                .collect()
        };

        Self {
            name: options.name.clone(),
            version: options.fields.version.clone(),
            description: options.fields.description.clone(),
            main: options.main.clone(),
            module_type: options.module_type.clone(),
            scripts: options.scripts.clone(),
            keywords: options.fields.keywords.clone(),
            author: options.fields.author.clone(),
            license: options.fields.license.clone(),
            dependencies: listed(&options.dependencies),
            dev_dependencies: listed(&options.dev_dependencies),
        }
    }
}

/// Split an npm install spec into name and optional range
///
/// `husky@8` gives `("husky", Some("8"))`; scoped names keep their leading `@`.
pub fn split_package_spec(spec: &str) -> (&str, Option<&str>) {
    match spec.rfind('@') {
        Some(idx) if idx > 0 => (&spec[..idx], Some(&spec[idx + 1..])),
        _ => (spec, None),
    }
}

/// Default manifest synthesizer
///
/// Writes `package.json` into the project directory, then installs the
/// dependency sets with npm when the options ask for it.
pub struct PackageJsonWriter<R = SystemRunner> {
    commands: Commands,
    runner: R,
}

impl<R: CommandRunner> PackageJsonWriter<R> {
    pub fn new(commands: Commands, runner: R) -> Self {
        Self { commands, runner }
    }

    async fn install(&self, options: &ManifestOptions) -> Result<()> {
        let batches = [
            (&self.commands.npm_install, &options.dependencies),
            (&self.commands.npm_install_dev, &options.dev_dependencies),
        ];

        for (command, packages) in batches {
            if packages.is_empty() {
                continue;
            }
            let command = command.with_args(packages.iter().cloned());
            self.runner
                .run(&command, &options.directory)
                .await
                .with_context(|| format!("Failed to install dependencies with \"{}\"", command))?;
        }

        Ok(())
    }
}

impl<R: CommandRunner> ManifestSynthesizer for PackageJsonWriter<R> {
    async fn synthesize(&self, options: &ManifestOptions) -> Result<()> {
        let options = if options.prompt {
            prompt_fields(options)?
        } else {
            options.clone()
        };

        fs::create_dir_all(&options.directory)
            .await
            .with_context(|| format!("Failed to create directory: {}", options.directory.display()))?;

        let manifest = PackageJson::from_options(&options);
        let mut content =
            serde_json::to_string_pretty(&manifest).context("Failed to serialize package.json")?;
        content.push('\n');

        let path = options.directory.join("package.json");
        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        debug!(path = %path.display(), "wrote package manifest");

        if options.install {
            self.install(&options).await?;
        }

        Ok(())
    }
}

#[cfg(feature = "tui")]
fn prompt_fields(options: &ManifestOptions) -> Result<ManifestOptions> {
    let mut options = options.clone();
    options.fields = crate::tui::prompt_manifest_fields(&options.name, &options.fields)?;
    Ok(options)
}

#[cfg(not(feature = "tui"))]
fn prompt_fields(options: &ManifestOptions) -> Result<ManifestOptions> {
    Ok(options.clone())
}
