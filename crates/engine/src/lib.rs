mod archive;
pub mod compare;
mod lister;
mod resolver;

#[cfg(test)]
mod test_support;

pub use archive::ArchiveSnapshotBuilder;
pub use compare::{Difference, directory_matches_archive, first_difference, snapshots_identical};
pub use lister::{ArchiveEntryRef, ArchiveLister, DirArchiveLister, ListError};
pub use resolver::{IncrementalResolver, Resolution, ResolverOptions, SkippedCandidate};
