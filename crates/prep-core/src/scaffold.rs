//! Create-if-absent directories and files.

use std::path::Path;

use crate::error::{PrepError, Result};
use crate::project::ProjectRoot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    /// A file written with this content verbatim.
    File(String),
    /// Like `File`, additionally marked executable on Unix.
    Executable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldEntry {
    /// Forward-slash path relative to the project root.
    pub path: String,
    pub kind: EntryKind,
}

impl ScaffoldEntry {
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }

    pub fn file(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File(content.into()),
        }
    }

    pub fn executable(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Executable(content.into()),
        }
    }
}

/// Ordered entries; parents must be listed before their children.
pub type ScaffoldPlan = Vec<ScaffoldEntry>;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScaffoldOutcome {
    pub created: Vec<String>,
    /// Entries whose target already existed.
    pub existing: Vec<String>,
}

impl ScaffoldOutcome {
    pub fn is_noop(&self) -> bool {
        self.created.is_empty()
    }
}

/// Create every entry of `plan` that does not exist yet. Existing targets are
/// never touched, even when their content differs from the template.
///
/// Directories are created one level at a time, so a missing parent that the
/// plan does not declare is an error rather than something created silently.
pub fn ensure(root: &ProjectRoot, plan: &[ScaffoldEntry]) -> Result<ScaffoldOutcome> {
    let mut outcome = ScaffoldOutcome::default();

    for entry in plan {
        let target = root.join(&entry.path);
        if target.exists() {
            outcome.existing.push(entry.path.clone());
            continue;
        }

        match &entry.kind {
            EntryKind::Directory => {
                std::fs::create_dir(&target).map_err(|e| PrepError::io(&target, e))?;
            }
            EntryKind::File(content) => {
                std::fs::write(&target, content).map_err(|e| PrepError::io(&target, e))?;
            }
            EntryKind::Executable(content) => {
                std::fs::write(&target, content).map_err(|e| PrepError::io(&target, e))?;
                make_executable(&target);
            }
        }
        log::debug!("Created {}", entry.path);
        outcome.created.push(entry.path.clone());
    }

    Ok(outcome)
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)) {
        log::warn!("Failed to mark {} executable: {e}", path.display());
    }
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
