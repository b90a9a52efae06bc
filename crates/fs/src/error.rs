use std::{error::Error as StdError, io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Failures raised while building or resolving snapshots.
///
/// Every variant is fatal to the call that raised it; no partial snapshot is
/// ever returned alongside an error.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Stat, read_dir or open failure on the live filesystem.
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The container could not be opened, or one of its entries is unreadable.
    #[error("cannot read archive {}{}: {source}", .archive.display(), entry_suffix(.entry))]
    ArchiveRead {
        archive: PathBuf,
        entry: Option<String>,
        #[source]
        source: io::Error,
    },

    /// The byte stream failed part way through digesting.
    #[error("hashing {path} failed: {source}")]
    HashComputation {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid exclude pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    /// The archive listing collaborator failed.
    #[error("cannot list archives in {}: {source}", .dir.display())]
    Listing {
        dir: PathBuf,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

fn entry_suffix(entry: &Option<String>) -> String {
    match entry {
        Some(name) => format!(" (entry {name:?})"),
        None => String::new(),
    }
}

impl SnapshotError {
    pub(crate) fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SnapshotError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Wrap an archive failure, converting the container library's error into `io::Error`.
    pub fn archive<E>(archive: impl Into<PathBuf>, entry: Option<String>, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        SnapshotError::ArchiveRead {
            archive: archive.into(),
            entry,
            source: io::Error::other(source),
        }
    }

    /// The filesystem or archive path this error names.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            SnapshotError::Filesystem { path, .. } => Some(path),
            SnapshotError::ArchiveRead { archive, .. } => Some(archive),
            SnapshotError::Listing { dir, .. } => Some(dir),
            SnapshotError::HashComputation { .. } | SnapshotError::InvalidPattern { .. } => None,
        }
    }
}
