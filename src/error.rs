use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeekError {
    // Access
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid source: {0}")]
    InvalidSource(String),

    #[error("IO error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Deep search backend
    #[error("search backend failed: {0}")]
    Backend(String),

    // Config
    #[error("malformed search config: {0}")]
    ConfigParse(String),

    #[error("settings store error: {0}")]
    Store(String),
}

impl SeekError {
    /// Classify an IO failure at `path`, giving permission and missing-path
    /// failures their own variants.
    pub fn from_io(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io { path, source: err },
        }
    }

    /// The directory or file the failure is about. `None` for backend and
    /// settings failures.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::Io { path: p, .. } => Some(p),
            _ => None,
        }
    }

    /// Whether a walk can continue after this error.
    ///
    /// A directory that cannot be listed contributes zero entries and the
    /// walk keeps going. Backend and store failures surface to the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PermissionDenied(_) | Self::NotFound(_) | Self::Io { .. } | Self::ConfigParse(_)
        )
    }
}
