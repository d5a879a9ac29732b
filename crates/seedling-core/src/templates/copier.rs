//! Recursive template copying

use super::{bundled_files, BundledTemplates, TemplateSource};
use crate::config::TemplateEntry;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

/// Copy a template entry into the project directory
///
/// A file source is copied to `project_dir/dest`; a directory source is
/// merged into `project_dir/dest`, overwriting files that already exist.
/// Returns the copied paths relative to `project_dir`.
pub async fn copy_template(
    source: &TemplateSource,
    entry: &TemplateEntry,
    project_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let dest_rel = PathBuf::from(entry.destination());
    let target = project_dir.join(&dest_rel);

    match source {
        TemplateSource::Bundled => copy_bundled(entry, &dest_rel, &target).await,
        TemplateSource::Local(root) => {
            copy_local(&root.join(&entry.source), &dest_rel, &target).await
        }
    }
}

async fn copy_bundled(
    entry: &TemplateEntry,
    dest_rel: &Path,
    target: &Path,
) -> Result<Vec<PathBuf>> {
    let files = bundled_files(&entry.source);
    if files.is_empty() {
        anyhow::bail!("Template source not found: bundled:{}", entry.source);
    }

    let mut copied_files = Vec::new();
    for (file, relative) in files {
        let asset = BundledTemplates::get(&file)
            .with_context(|| format!("Bundled template vanished: {}", file))?;
        // A single-file source has an empty relative path
        let (target_path, copied) = if relative.as_os_str().is_empty() {
            (target.to_path_buf(), dest_rel.to_path_buf())
        } else {
            (target.join(&relative), dest_rel.join(&relative))
        };
        write_file(&target_path, &asset.data).await?;
        copied_files.push(copied);
    }

    debug!(
        source = %entry.source,
        files = copied_files.len(),
        "copied bundled template"
    );

    Ok(copied_files)
}

async fn copy_local(source: &Path, dest_rel: &Path, target: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(source)
        .await
        .with_context(|| format!("Template source not found: {}", source.display()))?;

    if metadata.is_file() {
        copy_file(source, target).await?;
        return Ok(vec![dest_rel.to_path_buf()]);
    }

    // Ensure target directory exists
    fs::create_dir_all(target)
        .await
        .with_context(|| format!("Failed to create directory: {}", target.display()))?;

    let mut copied_files = Vec::new();

    for item in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let item =
            item.with_context(|| format!("Failed to read template tree: {}", source.display()))?;
        let relative = item
            .path()
            .strip_prefix(source)
            .with_context(|| format!("Unexpected path in template: {}", item.path().display()))?;
        let target_path = target.join(relative);

        if item.file_type().is_dir() {
            fs::create_dir_all(&target_path).await.with_context(|| {
                format!("Failed to create directory: {}", target_path.display())
            })?;
        } else {
            copy_file(item.path(), &target_path).await?;
            copied_files.push(dest_rel.join(relative));
        }
    }

    debug!(
        source = %source.display(),
        files = copied_files.len(),
        "copied template tree"
    );

    Ok(copied_files)
}

async fn create_parent(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

async fn write_file(target: &Path, content: &[u8]) -> Result<()> {
    create_parent(target).await?;
    fs::write(target, content)
        .await
        .with_context(|| format!("Failed to write file: {}", target.display()))?;
    Ok(())
}

async fn copy_file(source: &Path, target: &Path) -> Result<()> {
    create_parent(target).await?;

    fs::copy(source, target).await.with_context(|| {
        format!(
            "Failed to copy {} to {}",
            source.display(),
            target.display()
        )
    })?;
    Ok(())
}
