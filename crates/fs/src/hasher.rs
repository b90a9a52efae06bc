use std::{
    fs::File,
    io::{ErrorKind, Read},
    path::Path,
};

use ditto_runtime::HASH_CHUNK_SIZE;
use sha2::{Digest, Sha256};

use crate::error::{Result, SnapshotError};

/// Streams bytes through SHA-256 in fixed-size chunks, so memory use does not
/// grow with the size of the input.
#[derive(Debug, Clone, Copy)]
pub struct ContentHasher {
    chunk_size: usize,
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new(HASH_CHUNK_SIZE)
    }
}

impl ContentHasher {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    #[cfg(test)]
    pub(crate) fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Digest everything `reader` yields.
    ///
    /// `logical_path` only labels the error; it is never opened.
    pub fn hash_reader<R: Read>(&self, mut reader: R, logical_path: &str) -> Result<String> {
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; self.chunk_size];

        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(SnapshotError::HashComputation {
                        path: logical_path.to_owned(),
                        source,
                    });
                }
            };
            hasher.update(&buf[..n]);
        }

        Ok(hex::encode(hasher.finalize()))
    }

    /// Open `path` and digest its content. Failing to open is a filesystem
    /// error; failing part way through is a hashing error.
    pub fn hash_file(&self, path: &Path, logical_path: &str) -> Result<String> {
        let file = File::open(path).map_err(|e| SnapshotError::fs(path, e))?;
        self.hash_reader(file, logical_path)
    }
}

/// SHA-256 of an in-memory buffer as lowercase hex.
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
#[path = "hasher_tests.rs"]
mod tests;
