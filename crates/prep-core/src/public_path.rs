//! Locate the directory the web server serves the project from.
//!
//! Two passes, first hit wins:
//! 1. [`find_conventional`] checks a fixed list of usual names directly under
//!    the root.
//! 2. [`find_by_walk`] walks the whole tree, parents before children and
//!    siblings in lexicographic file-name order, skipping dependency vendor
//!    directories.

use path_slash::PathExt;
use std::path::{Component, Path};
use walkdir::WalkDir;

use crate::config::{CANONICAL_PUBLIC_PATH, PrepConfig};
use crate::error::{PrepError, Result};
use crate::project::ProjectRoot;

/// Where the web root lives and whether the operator asked to move it to
/// the canonical location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPathDecision {
    /// Forward-slash path relative to the project root.
    pub relative_path: String,
    pub rename_requested: bool,
}

impl PublicPathDecision {
    pub fn keep(relative_path: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            rename_requested: false,
        }
    }

    pub fn is_canonical(&self) -> bool {
        self.relative_path == CANONICAL_PUBLIC_PATH
    }

    /// The decision after a requested rename has been carried out.
    pub fn renamed(&self) -> Self {
        Self {
            relative_path: CANONICAL_PUBLIC_PATH.to_string(),
            rename_requested: self.rename_requested,
        }
    }

    /// A rename was asked for but the path has not moved yet.
    pub fn rename_pending(&self) -> bool {
        self.rename_requested && !self.is_canonical()
    }
}

/// Find the public path of the project under `root`.
pub fn locate(root: &ProjectRoot, config: &PrepConfig) -> Result<String> {
    if let Some(found) = find_conventional(root.path(), config) {
        log::debug!("Found conventional public path {found}");
        return Ok(found);
    }
    if let Some(found) = find_by_walk(root.path(), config) {
        log::debug!("Found public path {found} by walking the project");
        return Ok(found);
    }
    Err(PrepError::PublicPathNotFound(root.to_slash()))
}

/// First conventional name under `root` holding the entry file.
pub fn find_conventional(root: &Path, config: &PrepConfig) -> Option<String> {
    config
        .public_candidates
        .iter()
        .find(|name| root.join(name).join(config.entry_file).is_file())
        .map(|name| name.to_string())
}

/// First directory below `root`, in pre-order with sorted siblings, holding
/// the entry file. The root itself is never a candidate.
pub fn find_by_walk(root: &Path, config: &PrepConfig) -> Option<String> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let Ok(rel) = entry.path().strip_prefix(root) else {
                return false;
            };
            !entry.file_type().is_dir() || !is_excluded(rel, config)
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .find(|entry| entry.path().join(config.entry_file).is_file())
        .and_then(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .ok()
                .map(|rel| rel.to_slash_lossy().into_owned())
        })
}

/// Whether a directory at `rel` must never be considered: self/parent markers
/// and anything inside a dependency vendor directory.
pub fn is_excluded(rel: &Path, config: &PrepConfig) -> bool {
    rel.components().any(|component| match component {
        Component::CurDir | Component::ParentDir => true,
        Component::Normal(name) => name
            .to_str()
            .is_some_and(|name| config.vendor_dirs.contains(&name)),
        _ => false,
    })
}
