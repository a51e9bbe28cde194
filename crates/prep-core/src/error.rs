use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepError {
    #[error("No composer.json file found at {0}.")]
    MissingManifest(String),

    #[error("No composer.lock file found at {0}. Run `composer install` first.")]
    MissingLockFile(String),

    #[error("No Craft project found at {root} ({package} is not installed).")]
    PackageNotInstalled { root: String, package: String },

    #[error("Invalid {package} version `{version}`: only digits and dots are supported")]
    InvalidVersion { package: String, version: String },

    #[error("The project must be running {package} {minimum} or later (found {version}).")]
    VersionTooOld {
        package: String,
        version: String,
        minimum: String,
    },

    #[error("No public folder could be found in {0}.")]
    PublicPathNotFound(String),

    #[error("The public folder is still at {0}; it must be renamed first.")]
    RenameIncomplete(String),

    #[error("`{}` doesn't contain a valid document: {source}", path.display())]
    MalformedDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{}` doesn't exist.", .0.display())]
    NotFound(PathBuf),

    #[error("Unexpected structure in `{}`: {message}", path.display())]
    UnexpectedStructure { path: PathBuf, message: String },

    #[error("Failed to access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PrepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PrepError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a fatal precondition raised before any mutation.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            PrepError::MissingManifest(_)
                | PrepError::MissingLockFile(_)
                | PrepError::PackageNotInstalled { .. }
                | PrepError::InvalidVersion { .. }
                | PrepError::VersionTooOld { .. }
                | PrepError::PublicPathNotFound(_)
                | PrepError::MalformedDocument { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PrepError>;
