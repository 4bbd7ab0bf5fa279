//! First-run content for an empty content root.

use crate::path::{INDEX, STYLESHEET};
use anyhow::Context;
use std::{fs, io, path::Path};

const DEFAULT_INDEX: &str = include_str!("../assets/index.md");
const DEFAULT_STYLESHEET: &str = include_str!("../assets/style.css");

/// Creates the content root if it is missing. Failing here is fatal.
pub fn ensure_root(dir: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create content directory {}", dir.display()))
}

/// True when `dir` holds no top-level `.md` file. A missing directory is empty.
pub fn is_empty(dir: &Path) -> io::Result<bool> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(err) => return Err(err),
    };

    for entry in entries {
        let entry = entry?;
        let is_markdown = entry.file_name().to_string_lossy().ends_with(".md");
        if is_markdown && !entry.file_type()?.is_dir() {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Writes the sample `index.md`, and `style.css` unless one exists, into an
/// empty content root. Does nothing once any markdown is present.
pub fn ensure_sample_content(dir: &Path) -> anyhow::Result<()> {
    if !is_empty(dir).context("failed to inspect content directory")? {
        return Ok(());
    }

    let index = dir.join(INDEX);
    fs::write(&index, DEFAULT_INDEX).context("failed to create sample index.md")?;

    let stylesheet = dir.join(STYLESHEET);
    if !stylesheet.exists() {
        fs::write(&stylesheet, DEFAULT_STYLESHEET)
            .context("failed to create sample style.css")?;
        tracing::info!(path = %stylesheet.display(), "created sample style.css");
    }

    tracing::info!(path = %index.display(), "created sample index.md");
    Ok(())
}
