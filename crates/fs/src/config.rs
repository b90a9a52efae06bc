use ditto_runtime::HASH_CHUNK_SIZE;

/// Settings for one directory snapshot build.
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    /// Gitignore-style patterns, evaluated in order against root-relative paths.
    pub exclude_patterns: Vec<String>,

    /// Threads used to hash regular files. 0 or 1 hashes on the calling thread.
    pub hash_workers: usize,

    /// Read buffer size for the content digest.
    pub chunk_size: usize,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            exclude_patterns: Vec::new(),
            hash_workers: 1,
            chunk_size: HASH_CHUNK_SIZE,
        }
    }
}

impl SnapshotOptions {
    pub fn with_excludes<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude_patterns: patterns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}
