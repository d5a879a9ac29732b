//! Template resolution and copying
//!
//! This module provides:
//! - Template keys for the four template stages
//! - Template sources: the trees bundled into the binary, or a local directory
//! - Recursive copying of template trees into the project directory

pub mod copier;

use crate::config::{ScaffoldConfig, Step, TemplateEntry};
use crate::product::ProductConfig;
use rust_embed::RustEmbed;
use std::fmt;
use std::path::{Path, PathBuf};

pub use copier::copy_template;

/// Template trees shipped inside the binary
#[derive(RustEmbed)]
#[folder = "templates/"]
pub(crate) struct BundledTemplates;

/// The template stages a project can be built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    Base,
    Fetch,
    Docker,
    Commitlint,
}

impl TemplateKey {
    pub const ALL: [TemplateKey; 4] = [
        TemplateKey::Base,
        TemplateKey::Fetch,
        TemplateKey::Docker,
        TemplateKey::Commitlint,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TemplateKey::Base => "base",
            TemplateKey::Fetch => "fetch",
            TemplateKey::Docker => "docker",
            TemplateKey::Commitlint => "commitlint",
        }
    }

    /// The step reported once this template has been copied
    pub fn step(&self) -> Step {
        match self {
            TemplateKey::Base => Step::Base,
            TemplateKey::Fetch => Step::Fetch,
            TemplateKey::Docker => Step::Docker,
            TemplateKey::Commitlint => Step::Commitlint,
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where template trees are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Trees embedded in the binary
    Bundled,
    /// A template root on disk
    Local(PathBuf),
}

impl TemplateSource {
    /// Human-readable location of `entry` within this source
    pub fn locate(&self, entry: &TemplateEntry) -> String {
        match self {
            TemplateSource::Bundled => format!("bundled:{}", entry.source),
            TemplateSource::Local(root) => root.join(&entry.source).display().to_string(),
        }
    }

    /// Whether `entry` can be copied from this source
    pub fn contains(&self, entry: &TemplateEntry) -> bool {
        match self {
            TemplateSource::Bundled => !bundled_files(&entry.source).is_empty(),
            TemplateSource::Local(root) => root.join(&entry.source).exists(),
        }
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateSource::Bundled => write!(f, "bundled templates"),
            TemplateSource::Local(root) => write!(f, "{}", root.display()),
        }
    }
}

/// Bundled files under `source`, paired with their path relative to it
///
/// A `source` naming a single file yields that file with an empty relative path.
pub(crate) fn bundled_files(source: &str) -> Vec<(String, PathBuf)> {
    let source = source.trim_end_matches('/');
    let prefix = format!("{}/", source);

    let mut files: Vec<(String, PathBuf)> = BundledTemplates::iter()
        .filter_map(|file| {
            if file == source {
                Some((file.to_string(), PathBuf::new()))
            } else {
                file.strip_prefix(&prefix)
                    .map(|rest| (file.to_string(), PathBuf::from(rest)))
            }
        })
        .collect();
    files.sort();
    files
}

/// Pick the template source: explicit path, then the product's environment
/// override, then the bundled trees
pub fn resolve_template_source<C: ProductConfig>(
    config: &C,
    explicit: Option<&Path>,
) -> TemplateSource {
    if let Some(path) = explicit {
        return TemplateSource::Local(path.to_path_buf());
    }
    match std::env::var_os(config.template_dir_env()) {
        Some(dir) if !dir.is_empty() => TemplateSource::Local(PathBuf::from(dir)),
        _ => TemplateSource::Bundled,
    }
}

/// A template key with its resolved location
#[derive(Debug, Clone)]
pub struct ResolvedTemplate {
    pub key: TemplateKey,
    pub location: String,
    pub dest: String,
    pub exists: bool,
}

/// Resolve every configured template against `source`
pub fn list_templates(config: &ScaffoldConfig, source: &TemplateSource) -> Vec<ResolvedTemplate> {
    TemplateKey::ALL
        .iter()
        .map(|key| {
            let entry = config.templates.entry(*key);
            ResolvedTemplate {
                key: *key,
                location: source.locate(entry),
                dest: entry.destination().to_string(),
                exists: source.contains(entry),
            }
        })
        .collect()
}
