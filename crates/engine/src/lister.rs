use std::{
    error::Error,
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use ditto_runtime::DEFAULT_INCREMENTAL_MARKER;
use log::debug;

pub type ListError = Box<dyn Error + Send + Sync>;

/// One archive known to the lister. Read-only to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntryRef {
    pub path: PathBuf,
    /// As reported by the lister. Not authoritative; the resolver re-stats.
    pub creation_time: Option<SystemTime>,
    pub is_incremental: bool,
}

/// Enumerates the archives stored in an archive directory.
pub trait ArchiveLister {
    fn list_archives(&self, archive_dir: &Path) -> Result<Vec<ArchiveEntryRef>, ListError>;
}

impl<L: ArchiveLister + ?Sized> ArchiveLister for &L {
    fn list_archives(&self, archive_dir: &Path) -> Result<Vec<ArchiveEntryRef>, ListError> {
        (**self).list_archives(archive_dir)
    }
}

/// Lists `*.zip` files directly inside a directory, sorted by file name.
/// A file whose stem contains the incremental marker is an incremental archive.
#[derive(Debug, Clone)]
pub struct DirArchiveLister {
    incremental_marker: String,
}

impl Default for DirArchiveLister {
    fn default() -> Self {
        Self::new(DEFAULT_INCREMENTAL_MARKER)
    }
}

impl DirArchiveLister {
    pub fn new(incremental_marker: impl Into<String>) -> Self {
        Self {
            incremental_marker: incremental_marker.into(),
        }
    }

    fn is_incremental(&self, path: &Path) -> bool {
        !self.incremental_marker.is_empty()
            && path
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| stem.contains(&self.incremental_marker))
    }
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}

impl ArchiveLister for DirArchiveLister {
    fn list_archives(&self, archive_dir: &Path) -> Result<Vec<ArchiveEntryRef>, ListError> {
        let rd = match fs::read_dir(archive_dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("[list] {} does not exist", archive_dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut out = Vec::new();
        for entry_res in rd {
            let entry = entry_res?;
            let path = entry.path();
            if !is_zip(&path) {
                continue;
            }

            // Listing metadata is advisory; a failed stat here is left for
            // the resolver's own candidate check to report.
            let meta = entry.metadata().ok();
            if meta.as_ref().is_some_and(|m| m.is_dir()) {
                continue;
            }
            let creation_time = meta.and_then(|m| m.created().or_else(|_| m.modified()).ok());

            out.push(ArchiveEntryRef {
                is_incremental: self.is_incremental(&path),
                path,
                creation_time,
            });
        }

        out.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        debug!(
            "[list] {}: {} archives",
            archive_dir.display(),
            out.len()
        );
        Ok(out)
    }
}

#[cfg(test)]
#[path = "lister_tests.rs"]
mod tests;
