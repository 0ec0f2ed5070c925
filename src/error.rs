//! Error types for local filesystem state management

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reconciling local filesystem resources
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Filesystem operation failed at a specific path
    #[error("failed to {op} {}: {source}", .path.display())]
    Fs {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed base64 content payload
    #[error("invalid base64 content: {0}")]
    Base64(#[from] base64::DecodeError),

    /// More than one content source configured for the same file
    #[error("conflicting content sources: {0} and {1} are mutually exclusive")]
    ConflictingContent(&'static str, &'static str),

    /// No content source configured
    #[error("one of content, sensitive_content or content_base64 must be set")]
    MissingContent,

    /// Malformed permission string
    #[error("invalid permission {0:?}: expected 3-4 octal digits like \"0755\"")]
    InvalidMode(String),
}

impl Error {
    /// Attach the failed operation and path to an IO error.
    pub(crate) fn fs(op: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Fs {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns true if the underlying cause was "entry does not exist".
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io(e) => e.kind() == io::ErrorKind::NotFound,
            Self::Fs { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Result type for reconcile operations
pub type Result<T> = std::result::Result<T, Error>;
