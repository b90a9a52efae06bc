mod config;
mod error;
mod excludes;
mod hasher;
mod record;
mod snapshot;
mod walker;

pub use config::SnapshotOptions;
pub use error::{Result, SnapshotError};
pub use excludes::ExcludeSet;
pub use hasher::{ContentHasher, hash_bytes};
pub use record::FileRecord;
pub use snapshot::Snapshot;
pub use walker::DirectorySnapshotBuilder;
