//! Mapping request paths onto files under the content root.
//!
//! Two independent guards protect the root. [`validate`] screens the raw,
//! already percent-decoded request path before any filesystem access, and
//! [`ContentRoot::contain`] re-checks every candidate after it has been joined
//! to the root and symlink-resolved.

use crate::error::SiteError;
use soft_canonicalize::soft_canonicalize;
use std::{
    io,
    path::{Path, PathBuf},
};

pub const INDEX: &str = "index.md";
pub const STYLESHEET: &str = "style.css";

/// Rejects request paths that could step outside the content root.
///
/// `path` is the decoded request path with the leading `/` removed.
pub fn validate(path: &str) -> Result<(), SiteError> {
    if path.contains("..") {
        return Err(SiteError::InvalidPath("contains a parent directory segment"));
    }
    if path.contains("//") {
        return Err(SiteError::InvalidPath("contains an empty segment"));
    }
    if path.starts_with('/') {
        return Err(SiteError::InvalidPath("starts with a separator"));
    }
    if path.contains('\\') {
        return Err(SiteError::InvalidPath("contains a backslash"));
    }

    // Non-ASCII names are refused along with everything else outside the set.
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/');
    if !path.chars().all(allowed) {
        return Err(SiteError::InvalidPath("contains characters outside [A-Za-z0-9._/-]"));
    }

    Ok(())
}

/// What a request path resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Stylesheet(PathBuf),
    Markdown(PathBuf),
}

impl Target {
    pub fn path(&self) -> &Path {
        match self {
            Target::Stylesheet(path) | Target::Markdown(path) => path,
        }
    }
}

/// The directory every served file must live under.
#[derive(Debug, Clone)]
pub struct ContentRoot {
    root: PathBuf,
}

impl ContentRoot {
    /// Resolves `dir` (symlinks included) once, so later containment checks
    /// compare like with like.
    pub fn new(dir: impl AsRef<Path>) -> io::Result<Self> {
        let root = soft_canonicalize(dir.as_ref())?;
        Ok(Self { root })
    }

    pub fn as_path(&self) -> &Path {
        &self.root
    }

    /// Returns the symlink-resolved form of `candidate` if it stays under the
    /// root, or [`SiteError::UnsafePath`] otherwise.
    pub fn contain(&self, candidate: &Path) -> Result<PathBuf, SiteError> {
        let resolved = soft_canonicalize(candidate)
            .map_err(|_| SiteError::UnsafePath(candidate.display().to_string()))?;

        if resolved.strip_prefix(&self.root).is_ok() {
            Ok(resolved)
        } else {
            Err(SiteError::UnsafePath(candidate.display().to_string()))
        }
    }

    /// Maps a validated request path to the file that should answer it.
    ///
    /// Clean URLs gain a `.md` suffix, directory-style paths fall back to
    /// their `index.md`, and any other miss falls back to the root
    /// `index.md`. Every path returned has passed [`ContentRoot::contain`].
    pub fn resolve(&self, path: &str) -> Result<Target, SiteError> {
        let path = if path.is_empty() { INDEX } else { path };

        if path == STYLESHEET {
            let stylesheet = self.contain(&self.root.join(STYLESHEET))?;
            return if stylesheet.is_file() {
                Ok(Target::Stylesheet(stylesheet))
            } else {
                Err(SiteError::NotFound(STYLESHEET.into()))
            };
        }

        let directory_style = path.ends_with('/');
        let file = if path.ends_with(".md") || directory_style {
            path.to_string()
        } else {
            format!("{path}.md")
        };

        let candidate = self.contain(&self.root.join(&file))?;
        if candidate.is_file() {
            return Ok(Target::Markdown(candidate));
        }

        let fallback = if directory_style {
            self.contain(&self.root.join(&file).join(INDEX))?
        } else {
            self.contain(&self.root.join(INDEX))?
        };
        if fallback.is_file() {
            tracing::debug!(requested = %file, served = %fallback.display(), "falling back to index");
            Ok(Target::Markdown(fallback))
        } else {
            Err(SiteError::NotFound(file))
        }
    }
}
