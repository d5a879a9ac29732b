//! Product configuration trait for CLI binaries
//!
//! This trait defines the identity a scaffolding binary gives the core
//! library: names used in messages and manifests, where a template override comes from, and
//! the instructions printed once a project exists.

use std::path::Path;

/// Configuration trait for scaffolding products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used in generated manifests and env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Environment variable naming an on-disk template root that replaces
    /// the bundled templates
    fn template_dir_env(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path) -> Vec<String>;
}
