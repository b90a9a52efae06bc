use std::thread;

pub const PROGRAM_NAME: &str = "ditto";
pub const PROGRAM_LOG_LEVEL: &str = "DITTO_LOG_LEVEL";
/// When set, log lines are appended to this file instead of stderr.
pub const PROGRAM_LOG_FILE: &str = "DITTO_LOG_FILE";

/// Read buffer size used when streaming file content through the digest.
pub const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// Number of hex characters shown when a content hash is abbreviated.
pub const HASH_PREFIX_LEN: usize = 12;

/// File stem fragment that marks an archive as incremental.
pub const DEFAULT_INCREMENTAL_MARKER: &str = "_incremental";

/// Exclude patterns the CLI applies unless told otherwise.
/// Gitignore syntax, matched against root-relative paths.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    ".git/",
    ".hg/",
    ".svn/",
    ".DS_Store",
    "Thumbs.db",
];

/// Worker count for parallel hashing, one per available core.
pub fn default_hash_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
