pub mod check;
pub mod compare;
pub mod snapshot;

use std::{path::Path, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ditto_engine::ArchiveSnapshotBuilder;
use ditto_fs::{ContentHasher, DirectorySnapshotBuilder, Snapshot, SnapshotOptions};
use ditto_runtime::{DEFAULT_EXCLUDE_PATTERNS, PROGRAM_NAME, default_hash_workers};
use log::{debug, error};

pub use check::CheckArgs;
pub use compare::CompareArgs;
pub use snapshot::SnapshotArgs;

/// Exit status when the compared trees differ.
pub const EXIT_DIFFERENT: u8 = 1;
/// Exit status for any error.
pub const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = PROGRAM_NAME,
    version,
    about = "Ditto - tell whether a directory still matches its last backup archive",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the snapshot of a directory or zip archive.
    ///
    /// Example:
    ///   ditto snapshot ~/projects/site
    ///   ditto snapshot --json backups/2024-05-01.zip
    Snapshot(SnapshotArgs),

    /// Compare two directories or archives for byte-for-byte identity.
    ///
    /// Example:
    ///   ditto compare ~/projects/site backups/2024-05-01.zip
    Compare(CompareArgs),

    /// Check a directory against the newest full archive in a backup directory.
    ///
    /// Exits 0 when archiving can be skipped.
    ///
    /// Example:
    ///   ditto check ~/projects/site --archives backups/
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct ScanOptions {
    /// Exclude pattern (gitignore syntax), may be repeated. Evaluated in order.
    #[arg(long = "exclude", short = 'x', value_name = "PATTERN")]
    pub excludes: Vec<String>,

    /// Do not apply the built-in VCS and OS clutter excludes.
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Hashing threads (defaults to the number of cores).
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,
}

impl ScanOptions {
    pub fn snapshot_options(&self) -> SnapshotOptions {
        let defaults: &[&str] = if self.no_default_excludes {
            &[]
        } else {
            DEFAULT_EXCLUDE_PATTERNS
        };

        // User patterns come first so a `!pattern` can re-include a default.
        let patterns = self
            .excludes
            .iter()
            .cloned()
            .chain(defaults.iter().map(|p| p.to_string()));

        SnapshotOptions {
            hash_workers: self.jobs.unwrap_or_else(default_hash_workers),
            ..SnapshotOptions::with_excludes(patterns)
        }
    }
}

/// Where a snapshot comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Directory,
    Archive,
}

impl SourceKind {
    /// A path is an archive when it is a regular file; anything else is walked.
    pub fn detect(path: &Path) -> SourceKind {
        if path.is_file() {
            SourceKind::Archive
        } else {
            SourceKind::Directory
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Directory => "directory",
            SourceKind::Archive => "archive",
        }
    }
}

/// Build the snapshot of `path`, walking it or reading it as a zip.
pub fn load_snapshot(path: &Path, opts: &SnapshotOptions) -> Result<(Snapshot, SourceKind)> {
    let kind = SourceKind::detect(path);
    let snap = match kind {
        SourceKind::Directory => {
            let builder = DirectorySnapshotBuilder::new(opts.clone())?;
            debug!(
                "[load] {}: {} exclude rules",
                path.display(),
                builder.excludes().len()
            );
            builder
                .build(path)
                .with_context(|| format!("Failed to snapshot directory {}", path.display()))?
        }
        SourceKind::Archive => ArchiveSnapshotBuilder::new(ContentHasher::new(opts.chunk_size))
            .build(path)
            .with_context(|| format!("Failed to snapshot archive {}", path.display()))?,
    };
    Ok((snap, kind))
}

/// Log and report a command failure, returning the error exit status.
pub fn fail(tag: &str, e: anyhow::Error) -> ExitCode {
    error!("[{tag}] {e:#}");
    eprintln!("[{tag}] {e:#}");
    ExitCode::from(EXIT_ERROR)
}
