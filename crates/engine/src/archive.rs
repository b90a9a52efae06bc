use std::{collections::HashSet, fs::File, io::BufReader, path::Path};

use chrono::NaiveDate;
use ditto_fs::{ContentHasher, FileRecord, Result, Snapshot, SnapshotError};
use log::{debug, info};
use zip::{DateTime, ZipArchive};

/// Builds a [`Snapshot`] from a zip container.
///
/// Entries whose name ends in `/` are directory markers and are skipped, so an
/// archive snapshot only ever holds file records. Names are used verbatim as
/// relative paths; zip already stores them forward-slash separated.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveSnapshotBuilder {
    hasher: ContentHasher,
}

impl ArchiveSnapshotBuilder {
    pub fn new(hasher: ContentHasher) -> Self {
        Self { hasher }
    }

    pub fn build(&self, archive_path: &Path) -> Result<Snapshot> {
        let file =
            File::open(archive_path).map_err(|e| SnapshotError::archive(archive_path, None, e))?;
        let mut archive = ZipArchive::new(BufReader::new(file))
            .map_err(|e| SnapshotError::archive(archive_path, None, e))?;

        let mut records = Vec::with_capacity(archive.len());
        let mut seen: HashSet<String> = HashSet::with_capacity(archive.len());
        let mut markers = 0usize;

        for i in 0..archive.len() {
            // Raw access reads only the headers, so the name is known even
            // when the entry itself cannot be decoded.
            let name = archive
                .by_index_raw(i)
                .map(|raw| raw.name().to_owned())
                .map_err(|e| SnapshotError::archive(archive_path, Some(format!("#{i}")), e))?;

            if name.ends_with('/') {
                markers += 1;
                continue;
            }
            if !seen.insert(name.clone()) {
                return Err(SnapshotError::archive(
                    archive_path,
                    Some(name),
                    "entry name appears more than once",
                ));
            }

            let entry = archive
                .by_index(i)
                .map_err(|e| SnapshotError::archive(archive_path, Some(name.clone()), e))?;

            let size = entry.size();
            let mtime_secs = dos_time_to_unix(entry.last_modified());
            let logical_path = format!("{}!{}", archive_path.display(), name);

            // A bad checksum or broken deflate stream only surfaces while
            // reading; it is still the entry that is unreadable.
            let content_hash = self
                .hasher
                .hash_reader(entry, &logical_path)
                .map_err(|e| match e {
                    SnapshotError::HashComputation { source, .. } => {
                        SnapshotError::archive(archive_path, Some(name.clone()), source)
                    }
                    other => other,
                })?;

            records.push(FileRecord::file(name, size, mtime_secs, content_hash));
        }

        debug!(
            "[archive] {}: skipped {markers} directory markers",
            archive_path.display()
        );
        info!(
            "[archive] {}: {} file records",
            archive_path.display(),
            records.len()
        );

        Ok(Snapshot::from_records(records))
    }
}

/// Zip timestamps carry no zone; they are read as UTC.
fn dos_time_to_unix(dt: DateTime) -> u64 {
    NaiveDate::from_ymd_opt(dt.year().into(), dt.month().into(), dt.day().into())
        .and_then(|d| d.and_hms_opt(dt.hour().into(), dt.minute().into(), dt.second().into()))
        .map(|naive| naive.and_utc().timestamp())
        .and_then(|secs| u64::try_from(secs).ok())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
