//! Charm-style CLI prompts using cliclack

use crate::manifest::version;
use crate::manifest::ManifestFields;
use crate::product::ProductConfig;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Ask for the project directory when none was given on the command line
pub fn select_directory() -> Result<PathBuf> {
    let input: String = cliclack::input("Project directory")
        .placeholder("my-app")
        .validate(|input: &String| {
            if input.trim().is_empty() {
                Err("Please enter a directory name")
            } else {
                Ok(())
            }
        })
        .interact()?;

    let path = PathBuf::from(input.trim());

    // Validate parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    Ok(path)
}

/// Warn about a non-empty destination and ask whether to merge into it
pub fn confirm_existing_directory(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(true);
    }

    let count = std::fs::read_dir(path).map(|e| e.count()).unwrap_or(0);
    if count == 0 {
        return Ok(true);
    }

    cliclack::log::warning(format!("Directory has {} existing items", count))?;
    let confirm = cliclack::confirm("Continue anyway?")
        .initial_value(false)
        .interact()?;
    Ok(confirm)
}

/// Ask for the editable manifest fields, offering `defaults` as initial values
pub fn prompt_manifest_fields(name: &str, defaults: &ManifestFields) -> Result<ManifestFields> {
    cliclack::log::info(format!("Package details for {}", name))?;

    let description: String = cliclack::input("Description")
        .default_input(&defaults.description)
        .interact()?;

    let version_input: String = cliclack::input("Version")
        .default_input(&defaults.version)
        .validate(|input: &String| {
            version::parse_version(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact()?;

    let author: String = cliclack::input("Author")
        .default_input(&defaults.author)
        .required(false)
        .interact()?;

    let license: String = cliclack::input("License")
        .default_input(&defaults.license)
        .interact()?;

    let keywords: String = cliclack::input("Keywords (comma-separated)")
        .default_input(&defaults.keywords.join(", "))
        .required(false)
        .interact()?;

    Ok(ManifestFields {
        description,
        version: version::normalize_version(&version_input)?,
        author,
        license,
        keywords: parse_keywords(&keywords),
    })
}

fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Open the interactive session
pub fn intro<C: ProductConfig>(config: &C) -> Result<()> {
    cliclack::intro(config.display_name())?;
    Ok(())
}

/// Print the product's next steps and close the session
pub fn print_next_steps<C: ProductConfig>(config: &C, project_dir: &Path) -> Result<()> {
    let steps = config.next_steps(project_dir);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
