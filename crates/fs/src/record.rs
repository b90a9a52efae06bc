use serde::Serialize;

/// One entry of a [`crate::Snapshot`], from a live directory or an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Forward-slash path relative to the snapshot root
    pub relative_path: String,
    /// Byte count, 0 for directories
    pub size: u64,
    /// Last modified time as unix seconds. Informational only, never compared.
    pub mtime_secs: u64,
    pub is_dir: bool,
    /// Lowercase hex SHA-256 of the content, `None` for directories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl FileRecord {
    pub fn file(
        relative_path: impl Into<String>,
        size: u64,
        mtime_secs: u64,
        content_hash: String,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            size,
            mtime_secs,
            is_dir: false,
            content_hash: Some(content_hash),
        }
    }

    pub fn dir(relative_path: impl Into<String>, mtime_secs: u64) -> Self {
        Self {
            relative_path: relative_path.into(),
            size: 0,
            mtime_secs,
            is_dir: true,
            content_hash: None,
        }
    }
}
