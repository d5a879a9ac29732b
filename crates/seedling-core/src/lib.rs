//! Seedling Core - Shared library for Node.js project scaffolding
//!
//! This library copies template trees into a new project directory, writes
//! its `package.json`, and runs the git and hook setup commands that turn the
//! directory into a ready-to-use repository.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Configuration loading, template copying, command execution
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and `Scaffolder`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts module
//!
//! # Example Usage
//!
//! ```ignore
//! use seedling_core::{
//!     PackageJsonWriter, ScaffoldConfig, ScaffoldRequest, Scaffolder, SystemRunner, TemplateSource,
//! };
//!
//! let config = ScaffoldConfig::embedded()?;
//! let writer = PackageJsonWriter::new(config.commands.clone(), SystemRunner);
//! let scaffolder = Scaffolder::new(config, TemplateSource::Bundled, "seedling", SystemRunner, writer);
//! let summary = scaffolder.run(&ScaffoldRequest { directory: "demo".into(), ..Default::default() }).await?;
//! ```

pub mod config;
pub mod manifest;
pub mod product;
pub mod report;
pub mod runtime;
pub mod scaffold;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{CommandLine, ScaffoldConfig, Step};
pub use manifest::{ManifestOptions, ManifestSynthesizer, PackageJsonWriter};
pub use product::ProductConfig;
pub use runtime::{CommandError, CommandRunner, RuntimeInfo, SystemRunner};
pub use scaffold::{ScaffoldRequest, ScaffoldSummary, Scaffolder, StageFailure};
pub use templates::{copy_template, resolve_template_source, TemplateKey, TemplateSource};
