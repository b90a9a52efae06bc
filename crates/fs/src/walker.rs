use std::{
    fs::{self, DirEntry, Metadata},
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::{SystemTime, UNIX_EPOCH},
};

use crossbeam::channel::{self, Receiver};
use log::{debug, info};

use crate::{
    config::SnapshotOptions,
    error::{Result, SnapshotError},
    excludes::ExcludeSet,
    hasher::ContentHasher,
    record::FileRecord,
    snapshot::Snapshot,
};

/// Builds a [`Snapshot`] of a live directory tree.
///
/// The walk is an explicit stack of pending directories; excluded directories
/// are never pushed, which prunes their whole subtree. Regular files are
/// hashed after the walk, optionally on a scoped worker pool, and the result
/// is sorted once everything has been collected.
#[derive(Debug)]
pub struct DirectorySnapshotBuilder {
    excludes: ExcludeSet,
    hasher: ContentHasher,
    hash_workers: usize,
}

/// A regular file waiting for its digest. `slot` indexes the collected records.
#[derive(Debug)]
struct HashJob {
    slot: usize,
    full_path: PathBuf,
    rel_path: String,
}

/// Records in traversal order plus the files still to hash.
#[derive(Debug, Default)]
struct Collected {
    records: Vec<FileRecord>,
    jobs: Vec<HashJob>,
}

impl DirectorySnapshotBuilder {
    pub fn new(options: SnapshotOptions) -> Result<Self> {
        Ok(Self {
            excludes: ExcludeSet::new(&options.exclude_patterns)?,
            hasher: ContentHasher::new(options.chunk_size),
            hash_workers: options.hash_workers,
        })
    }

    pub fn excludes(&self) -> &ExcludeSet {
        &self.excludes
    }

    pub fn build(&self, root: &Path) -> Result<Snapshot> {
        let meta = fs::metadata(root).map_err(|e| SnapshotError::fs(root, e))?;
        if !meta.is_dir() {
            return Err(SnapshotError::fs(
                root,
                io::Error::new(ErrorKind::NotADirectory, "snapshot root is not a directory"),
            ));
        }

        let Collected { mut records, jobs } = self.collect(root)?;
        let hashed = jobs.len();

        for (slot, digest) in self.hash_jobs(jobs)? {
            records[slot].content_hash = Some(digest);
        }

        info!(
            "[snapshot] {}: {} records, {} files hashed",
            root.display(),
            records.len(),
            hashed
        );

        Ok(Snapshot::from_records(records))
    }

    fn collect(&self, root: &Path) -> Result<Collected> {
        let mut out = Collected::default();
        // (absolute dir, its root-relative prefix)
        let mut stack: Vec<(PathBuf, String)> = vec![(root.to_path_buf(), String::new())];

        while let Some((dir, prefix)) = stack.pop() {
            let rd = fs::read_dir(&dir).map_err(|e| SnapshotError::fs(&dir, e))?;

            for entry_res in rd {
                let entry = entry_res.map_err(|e| SnapshotError::fs(&dir, e))?;
                if let Some(subdir) = self.visit_entry(&entry, &prefix, &mut out)? {
                    stack.push(subdir);
                }
            }
        }

        Ok(out)
    }

    /// Record one directory entry. Returns the subdirectory to descend into, if any.
    fn visit_entry(
        &self,
        entry: &DirEntry,
        prefix: &str,
        out: &mut Collected,
    ) -> Result<Option<(PathBuf, String)>> {
        let full_path = entry.path();
        let rel_path = relative_child(prefix, entry, &full_path)?;

        let file_type = entry
            .file_type()
            .map_err(|e| SnapshotError::fs(&full_path, e))?;

        // Symlinks are judged by their target, but never descended.
        let is_symlink = file_type.is_symlink();
        let target = is_symlink.then(|| fs::metadata(&full_path));
        let looks_like_dir = match &target {
            Some(Ok(m)) => m.is_dir(),
            Some(Err(_)) => false,
            None => file_type.is_dir(),
        };

        if let Some(pattern) = self.excludes.excluded_by(&rel_path, looks_like_dir) {
            debug!("[walk] {rel_path} excluded by {pattern:?}");
            return Ok(None);
        }

        let meta: Metadata = match target {
            Some(res) => res,
            None => entry.metadata(),
        }
        .map_err(|e| SnapshotError::fs(&full_path, e))?;

        let mtime_secs = to_unix_secs(meta.modified().ok());

        if meta.is_dir() {
            out.records.push(FileRecord::dir(rel_path.clone(), mtime_secs));
            if is_symlink {
                debug!("[walk] not following directory symlink {rel_path}");
                return Ok(None);
            }
            return Ok(Some((full_path, rel_path)));
        }

        if !meta.is_file() {
            debug!("[walk] skipping special file {rel_path}");
            return Ok(None);
        }

        out.jobs.push(HashJob {
            slot: out.records.len(),
            full_path,
            rel_path: rel_path.clone(),
        });
        out.records.push(FileRecord {
            relative_path: rel_path,
            size: meta.len(),
            mtime_secs,
            is_dir: false,
            content_hash: None,
        });

        Ok(None)
    }

    fn hash_jobs(&self, jobs: Vec<HashJob>) -> Result<Vec<(usize, String)>> {
        let workers = self.hash_workers.min(jobs.len());
        if workers <= 1 {
            return jobs
                .into_iter()
                .map(|job| {
                    self.hasher
                        .hash_file(&job.full_path, &job.rel_path)
                        .map(|digest| (job.slot, digest))
                })
                .collect();
        }

        let total = jobs.len();
        let (job_tx, job_rx) = channel::bounded::<HashJob>(total);
        for job in jobs {
            // Capacity equals the job count, so this never blocks.
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        debug!("[hash] {total} files on {workers} threads");

        let failed = AtomicBool::new(false);
        let per_worker: Vec<Result<Vec<(usize, String)>>> = thread::scope(|s| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let job_rx = job_rx.clone();
                    let hasher = self.hasher;
                    let failed = &failed;
                    s.spawn(move || hash_worker(job_rx, hasher, failed))
                })
                .collect();

            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        });

        let mut digests = Vec::with_capacity(total);
        for batch in per_worker {
            digests.extend(batch?);
        }
        Ok(digests)
    }
}

/// Drains the shared queue into a worker-owned result list. Stops early once
/// any worker has failed.
fn hash_worker(
    job_rx: Receiver<HashJob>,
    hasher: ContentHasher,
    failed: &AtomicBool,
) -> Result<Vec<(usize, String)>> {
    let mut done = Vec::new();

    for job in job_rx.iter() {
        if failed.load(Ordering::Acquire) {
            break;
        }
        match hasher.hash_file(&job.full_path, &job.rel_path) {
            Ok(digest) => done.push((job.slot, digest)),
            Err(e) => {
                failed.store(true, Ordering::Release);
                return Err(e);
            }
        }
    }

    Ok(done)
}

fn relative_child(prefix: &str, entry: &DirEntry, full_path: &Path) -> Result<String> {
    let name = entry.file_name().into_string().map_err(|raw| {
        SnapshotError::fs(
            full_path,
            io::Error::new(
                ErrorKind::InvalidData,
                format!("file name {raw:?} is not valid UTF-8"),
            ),
        )
    })?;

    Ok(if prefix.is_empty() {
        name
    } else {
        format!("{prefix}/{name}")
    })
}

fn to_unix_secs(t: Option<SystemTime>) -> u64 {
    t.and_then(|tt| tt.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
