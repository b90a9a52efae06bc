use super::*;
use std::io::{self, Cursor};

const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Yields `good` bytes, then fails.
struct FailingReader {
    good: Vec<u8>,
    served: bool,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.served {
            self.served = true;
            let n = self.good.len().min(buf.len());
            buf[..n].copy_from_slice(&self.good[..n]);
            return Ok(n);
        }
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"))
    }
}

/// Interrupts every other read.
struct InterruptingReader {
    inner: Cursor<Vec<u8>>,
    interrupt_next: bool,
}

impl Read for InterruptingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt_next = !self.interrupt_next;
        if self.interrupt_next {
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        self.inner.read(buf)
    }
}

#[test]
fn hash_bytes_matches_known_digests() {
    assert_eq!(hash_bytes(b"hello"), HELLO_SHA256);
    assert_eq!(hash_bytes(b""), EMPTY_SHA256);
}

#[test]
fn hash_reader_is_independent_of_chunk_size() {
    let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    let expected = hash_bytes(&data);

    for chunk in [1, 7, 64, 4096, 1 << 20] {
        let hasher = ContentHasher::new(chunk);
        let got = hasher
            .hash_reader(Cursor::new(&data), "mem")
            .expect("hash in-memory data");
        assert_eq!(got, expected, "chunk size {chunk} changed the digest");
    }
}

#[test]
fn zero_chunk_size_is_clamped() {
    let hasher = ContentHasher::new(0);
    assert_eq!(hasher.chunk_size(), 1);
    assert_eq!(
        hasher.hash_reader(Cursor::new(b"hello"), "mem").unwrap(),
        HELLO_SHA256
    );
}

#[test]
fn hash_reader_retries_interrupted_reads() {
    let reader = InterruptingReader {
        inner: Cursor::new(b"hello".to_vec()),
        interrupt_next: false,
    };
    let got = ContentHasher::new(2)
        .hash_reader(reader, "mem")
        .expect("interrupted reads are retried");
    assert_eq!(got, HELLO_SHA256);
}

#[test]
fn mid_stream_failure_is_hash_computation_error() {
    let reader = FailingReader {
        good: b"partial".to_vec(),
        served: false,
    };

    let err = ContentHasher::default()
        .hash_reader(reader, "backup.zip!a.txt")
        .expect_err("failing reader must error");

    match err {
        SnapshotError::HashComputation { path, source } => {
            assert_eq!(path, "backup.zip!a.txt");
            assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
        }
        other => panic!("expected HashComputation, got {other:?}"),
    }
}

#[test]
fn hash_file_reads_from_disk() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = tmp.path().join("a.txt");
    std::fs::write(&path, b"hello").expect("write file");

    let got = ContentHasher::default()
        .hash_file(&path, "a.txt")
        .expect("hash file");
    assert_eq!(got, HELLO_SHA256);
}

#[test]
fn hash_file_missing_is_filesystem_error() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let path = tmp.path().join("missing.txt");

    let err = ContentHasher::default()
        .hash_file(&path, "missing.txt")
        .expect_err("missing file must error");

    assert!(matches!(err, SnapshotError::Filesystem { .. }));
    assert_eq!(err.path(), Some(path.as_path()));
}
