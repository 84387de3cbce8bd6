use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use romshelf_core::Fingerprint;
use romshelf_dat::DatError;

/// Errors that abort a whole import, check or export run.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The staging (or other required) folder does not exist.
    #[error("Folder not found: {}", .0.display())]
    MissingFolder(PathBuf),

    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error(transparent)]
    Dat(#[from] DatError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A problem with one file. Never fatal: the run records it and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemIssue {
    #[error("missing file: {}", .path.display())]
    MissingFile { path: PathBuf },

    #[error("'{title}' ({fingerprint}) has no external identity")]
    UnknownExternalIdentity {
        title: String,
        fingerprint: Fingerprint,
    },

    #[error("{} exists but is not in the catalog", .destination.display())]
    DestinationCollision { destination: PathBuf },

    #[error("could not move to {}: {reason}", .destination.display())]
    MoveFailed {
        destination: PathBuf,
        reason: String,
    },

    #[error("could not hash {}: {reason}", .path.display())]
    HashFailed { path: PathBuf, reason: String },
}

impl ItemIssue {
    pub fn hash_failed(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::HashFailed {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    pub fn move_failed(destination: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::MoveFailed {
            destination: destination.into(),
            reason: err.to_string(),
        }
    }
}
