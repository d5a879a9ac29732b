//! Static scaffolding configuration
//!
//! Everything the orchestrator needs to know about steps, commands,
//! dependency sets, manifest defaults and template locations lives in one
//! YAML document. A default copy is embedded in the binary; callers may load
//! a replacement from disk.

use crate::templates::TemplateKey;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// The embedded default configuration document
pub const DEFAULT_CONFIG: &str = include_str!("default.yaml");

/// Root configuration document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScaffoldConfig {
    /// Human-readable description for every reported step
    pub steps: Steps,

    /// External commands run after the manifest is written
    pub commands: Commands,

    /// Runtime dependencies every project gets
    pub dependencies: Vec<String>,

    /// Development dependencies every project gets
    pub dev_dependencies: Vec<String>,

    /// Feature-gated dependency additions
    pub extra_deps: ExtraDeps,

    /// Base package manifest defaults
    pub options: ManifestDefaults,

    /// Feature-conditional manifest overrides
    pub extra_options: ExtraOptions,

    /// Template sources, relative to the template root
    pub templates: Templates,
}

impl ScaffoldConfig {
    /// Parse a configuration document from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse scaffold configuration")
    }

    /// Load a configuration document from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// The configuration embedded in the binary
    pub fn embedded() -> Result<Self> {
        Self::from_yaml(DEFAULT_CONFIG)
    }

    /// Load from `path` if given, otherwise fall back to the embedded default
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::embedded(),
        }
    }
}

/// A reportable step of the scaffolding run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Start,
    Base,
    Fetch,
    Docker,
    Commitlint,
    Package,
    Npm,
    Git,
    Env,
    Husky,
    CommitlintHook,
    Commit,
}

impl Step {
    /// Configuration key of the step, also used as its printed label
    pub fn key(&self) -> &'static str {
        match self {
            Step::Start => "start",
            Step::Base => "base",
            Step::Fetch => "fetch",
            Step::Docker => "docker",
            Step::Commitlint => "commitlint",
            Step::Package => "package",
            Step::Npm => "npm",
            Step::Git => "git",
            Step::Env => "env",
            Step::Husky => "husky",
            Step::CommitlintHook => "commitlint_hook",
            Step::Commit => "commit",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Step descriptions, one field per [`Step`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Steps {
    pub start: String,
    pub base: String,
    pub fetch: String,
    pub docker: String,
    pub commitlint: String,
    pub package: String,
    pub npm: String,
    pub git: String,
    pub env: String,
    pub husky: String,
    pub commitlint_hook: String,
    pub commit: String,
}

impl Steps {
    pub fn describe(&self, step: Step) -> &str {
        match step {
            Step::Start => &self.start,
            Step::Base => &self.base,
            Step::Fetch => &self.fetch,
            Step::Docker => &self.docker,
            Step::Commitlint => &self.commitlint,
            Step::Package => &self.package,
            Step::Npm => &self.npm,
            Step::Git => &self.git,
            Step::Env => &self.env,
            Step::Husky => &self.husky,
            Step::CommitlintHook => &self.commitlint_hook,
            Step::Commit => &self.commit,
        }
    }
}

/// A single external command as an argv list (program first)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandLine(pub Vec<String>);

impl CommandLine {
    pub fn new<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(argv.into_iter().map(Into::into).collect())
    }

    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or(&[])
    }

    /// Return a copy with `extra` appended to the argument list
    pub fn with_args<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = self.0.clone();
        argv.extend(extra.into_iter().map(Into::into));
        Self(argv)
    }

    /// Append `flag` only when `enabled` is set
    pub fn with_flag_if(&self, flag: &str, enabled: bool) -> Self {
        if enabled {
            self.with_args([flag])
        } else {
            self.clone()
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|arg| {
                if arg.is_empty() || arg.contains(char::is_whitespace) {
                    format!("{:?}", arg)
                } else {
                    arg.clone()
                }
            })
            .collect();
        write!(f, "{}", rendered.join(" "))
    }
}

/// Post-manifest commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Commands {
    pub git_init: CommandLine,
    pub create_local_env: CommandLine,
    /// Hook setup, run in order
    pub husky: Vec<CommandLine>,
    pub husky_commitlint: CommandLine,
    pub git_add: CommandLine,
    pub git_commit: CommandLine,
    /// Package names are appended to these
    pub npm_install: CommandLine,
    pub npm_install_dev: CommandLine,
}

/// Feature-gated dependency additions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtraDeps {
    /// Added to `dependencies` with the fetch helper
    #[serde(default)]
    pub fetch: Vec<String>,

    /// Added to `dependencies` with the Docker files
    #[serde(default)]
    pub docker: Vec<String>,

    /// Added to `dev_dependencies` with commitlint
    #[serde(default)]
    pub commitlint: Vec<String>,
}

/// Defaults for the generated package manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestDefaults {
    pub version: String,
    pub main: String,
    /// Value of the manifest's `type` field
    pub module_type: String,
    pub license: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Install dependencies through npm after writing the manifest
    #[serde(default = "default_install")]
    pub install: bool,
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

fn default_install() -> bool {
    true
}

/// Feature-conditional manifest overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtraOptions {
    /// Merged over the base scripts when commitlint is not requested
    #[serde(default)]
    pub commitlint_fallback: ScriptOverrides,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptOverrides {
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

/// A template source and where it lands in the project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateEntry {
    /// Source path relative to the template root (file or directory)
    pub source: String,

    /// Destination relative to the project directory (defaults to the project root)
    #[serde(default)]
    pub dest: Option<String>,
}

impl TemplateEntry {
    pub fn destination(&self) -> &str {
        self.dest.as_deref().unwrap_or("")
    }
}

/// Template locations, one per [`TemplateKey`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Templates {
    pub base: TemplateEntry,
    pub fetch: TemplateEntry,
    pub docker: TemplateEntry,
    pub commitlint: TemplateEntry,
}

impl Templates {
    pub fn entry(&self, key: TemplateKey) -> &TemplateEntry {
        match key {
            TemplateKey::Base => &self.base,
            TemplateKey::Fetch => &self.fetch,
            TemplateKey::Docker => &self.docker,
            TemplateKey::Commitlint => &self.commitlint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_config_parses() {
        let config = ScaffoldConfig::embedded().unwrap();
        assert!(!config.dependencies.is_empty());
        assert!(config.options.install);
        assert_eq!(config.templates.fetch.destination(), "src/utils/utils.mjs");
        assert_eq!(config.templates.base.destination(), "");
    }

    #[test]
    fn test_every_step_has_a_description() {
        let config = ScaffoldConfig::embedded().unwrap();
        for step in [
            Step::Start,
            Step::Base,
            Step::Fetch,
            Step::Docker,
            Step::Commitlint,
            Step::Package,
            Step::Npm,
            Step::Git,
            Step::Env,
            Step::Husky,
            Step::CommitlintHook,
            Step::Commit,
        ] {
            assert!(
                !config.steps.describe(step).is_empty(),
                "missing description for {}",
                step
            );
        }
    }

    #[test]
    fn test_missing_step_is_a_parse_error() {
        let broken = DEFAULT_CONFIG.replace("  commit: \"Created initial commit\"\n", "");
        assert_ne!(broken, DEFAULT_CONFIG);
        let err = ScaffoldConfig::from_yaml(&broken).unwrap_err();
        assert!(format!("{:#}", err).contains("missing field `commit`"));
    }

    #[test]
    fn test_command_line_flag_and_display() {
        let commit = CommandLine::new(["git", "commit", "-m", "chore: initial commit"]);
        assert_eq!(commit.program(), Some("git"));
        assert_eq!(commit.args().len(), 3);

        let quiet = commit.with_flag_if("--quiet", true);
        assert_eq!(quiet.0.last().map(String::as_str), Some("--quiet"));
        assert_eq!(commit.with_flag_if("--quiet", false), commit);

        assert_eq!(
            commit.to_string(),
            "git commit -m \"chore: initial commit\""
        );
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seedling.yaml");
        let custom = DEFAULT_CONFIG.replace("- dotenv", "- dotenv\n  - zod");
        std::fs::write(&path, custom).unwrap();

        let config = ScaffoldConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.dependencies, vec!["dotenv", "zod"]);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = ScaffoldConfig::load(Path::new("/nonexistent/seedling.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
