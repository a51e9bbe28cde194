use path_slash::PathExt;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{PrepError, Result};

/// Absolute root of the project tree being migrated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    path: PathBuf,
}

impl ProjectRoot {
    /// Resolve `path` to an absolute path. Relative paths are taken from the
    /// current working directory.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let absolute = std::path::absolute(path).map_err(|e| PrepError::io(path, e))?;
        Ok(Self { path: absolute })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Join a forward-slash relative path onto the root.
    pub fn join(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.path.clone(), |acc, segment| acc.join(segment))
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.join(rel).exists()
    }

    /// The root with forward-slash separators on every platform.
    pub fn to_slash(&self) -> String {
        self.path.to_slash_lossy().into_owned()
    }
}

impl fmt::Display for ProjectRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_slash())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_root_becomes_absolute() -> anyhow::Result<()> {
        let root = ProjectRoot::new("some/project")?;
        assert!(root.path().is_absolute());
        assert!(root.to_slash().ends_with("some/project"));
        Ok(())
    }

    #[test]
    fn test_join_splits_forward_slashes() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let root = ProjectRoot::new(temp.path())?;
        assert_eq!(
            root.join("storage/framework/cache"),
            temp.path().join("storage").join("framework").join("cache")
        );
        Ok(())
    }
}
