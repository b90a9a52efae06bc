use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use ditto_fs::{ContentHasher, DirectorySnapshotBuilder, Result, SnapshotError, SnapshotOptions};
use log::{debug, info, warn};

use crate::{
    archive::ArchiveSnapshotBuilder,
    compare::directory_matches_archive,
    lister::{ArchiveEntryRef, ArchiveLister},
};

#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// Applied to the live directory; the archive side only uses `chunk_size`.
    pub snapshot: SnapshotOptions,
}

/// A full-archive candidate that could not be statted and was passed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCandidate {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of one resolution.
///
/// `baseline` is `None` when no full archive was usable, in which case
/// `identical` is always false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub identical: bool,
    pub baseline: Option<PathBuf>,
    pub skipped: Vec<SkippedCandidate>,
}

impl Resolution {
    fn no_baseline(skipped: Vec<SkippedCandidate>) -> Self {
        Self {
            identical: false,
            baseline: None,
            skipped,
        }
    }

    #[inline]
    pub fn matched_path(&self) -> Option<&Path> {
        self.baseline.as_deref()
    }
}

/// Answers "is this directory identical to the newest full archive?".
pub struct IncrementalResolver<L> {
    lister: L,
    directory: DirectorySnapshotBuilder,
    archive: ArchiveSnapshotBuilder,
}

impl<L: ArchiveLister> IncrementalResolver<L> {
    /// Exclude patterns are compiled here, so a bad pattern fails before any I/O.
    pub fn new(lister: L, options: ResolverOptions) -> Result<Self> {
        let archive = ArchiveSnapshotBuilder::new(ContentHasher::new(options.snapshot.chunk_size));
        let directory = DirectorySnapshotBuilder::new(options.snapshot)?;
        Ok(Self {
            lister,
            directory,
            archive,
        })
    }

    pub fn resolve(&self, target_dir: &Path, archive_dir: &Path) -> Result<Resolution> {
        let archives = self
            .lister
            .list_archives(archive_dir)
            .map_err(|source| SnapshotError::Listing {
                dir: archive_dir.to_path_buf(),
                source,
            })?;

        if archives.is_empty() {
            info!("[resolve] no archives in {}", archive_dir.display());
            return Ok(Resolution::no_baseline(Vec::new()));
        }

        let (baseline, skipped) = select_baseline(&archives);
        let Some(baseline) = baseline else {
            info!(
                "[resolve] no usable full archive among {} in {}",
                archives.len(),
                archive_dir.display()
            );
            return Ok(Resolution::no_baseline(skipped));
        };

        debug!("[resolve] baseline {}", baseline.display());

        // Once a baseline is chosen, any failure is fatal to the call.
        let archive_snapshot = self.archive.build(&baseline)?;
        let dir_snapshot = self.directory.build(target_dir)?;
        let identical = directory_matches_archive(&dir_snapshot, &archive_snapshot);

        info!(
            "[resolve] {} {} {}",
            target_dir.display(),
            if identical { "matches" } else { "differs from" },
            baseline.display()
        );

        Ok(Resolution {
            identical,
            baseline: Some(baseline),
            skipped,
        })
    }
}

/// Newest non-incremental candidate by on-disk timestamp. Ties keep the
/// candidate met first; candidates that fail to stat are skipped.
fn select_baseline(archives: &[ArchiveEntryRef]) -> (Option<PathBuf>, Vec<SkippedCandidate>) {
    let mut best: Option<(&Path, SystemTime)> = None;
    let mut skipped = Vec::new();

    for candidate in archives.iter().filter(|a| !a.is_incremental) {
        let stamp = fs::metadata(&candidate.path).and_then(|m| m.created().or_else(|_| m.modified()));

        let stamp = match stamp {
            Ok(t) => t,
            Err(e) => {
                warn!(
                    "[resolve] skipping {}: {e}",
                    candidate.path.display()
                );
                skipped.push(SkippedCandidate {
                    path: candidate.path.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        match best {
            Some((_, newest)) if stamp <= newest => {}
            _ => best = Some((&candidate.path, stamp)),
        }
    }

    (best.map(|(p, _)| p.to_path_buf()), skipped)
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
