use atomicwrites::{AtomicFile, OverwriteBehavior};
use std::io::Write;
use std::path::Path;

use crate::error::{PrepError, Result};

pub(crate) fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PrepError::NotFound(path.to_path_buf())
        } else {
            PrepError::io(path, e)
        }
    })
}

/// Replace `path` with `contents` through a temporary file in the same
/// directory, so readers never observe a half-written file.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| {
            f.write_all(contents.as_bytes())?;
            f.flush()
        })
        .map_err(|err| {
            let source = match err {
                atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => e,
            };
            PrepError::io(path, source)
        })
}
