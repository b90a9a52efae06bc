use super::*;
use crate::test_support::write_zip;

use std::{fs, io::Write, path::Path};

use ditto_fs::hash_bytes;
use zip::{CompressionMethod, ZipWriter, write::FileOptions};

fn paths(snap: &Snapshot) -> Vec<&str> {
    snap.iter().map(|r| r.relative_path.as_str()).collect()
}

#[test]
fn directory_markers_are_skipped_and_files_sorted() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let zip_path = tmp.path().join("backup.zip");
    write_zip(
        &zip_path,
        &[
            ("sub/", None),
            ("sub/b.txt", Some("world")),
            ("a.txt", Some("hello")),
        ],
    );

    let snap = ArchiveSnapshotBuilder::default()
        .build(&zip_path)
        .expect("build archive snapshot");

    assert_eq!(paths(&snap), vec!["a.txt", "sub/b.txt"]);
    assert!(snap.iter().all(|r| !r.is_dir));

    let a = snap.get("a.txt").expect("a.txt present");
    assert_eq!(a.size, 5);
    assert_eq!(a.content_hash.as_deref(), Some(hash_bytes(b"hello").as_str()));
}

#[test]
fn stored_timestamp_becomes_mtime() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let zip_path = tmp.path().join("dated.zip");

    let stamp = DateTime::from_date_and_time(2024, 3, 15, 12, 30, 20).expect("valid dos time");
    {
        let mut zip = ZipWriter::new(fs::File::create(&zip_path).expect("create zip"));
        let options = FileOptions::default().last_modified_time(stamp);
        zip.start_file("a.txt", options).expect("start entry");
        zip.write_all(b"hello").expect("write entry");
        zip.finish().expect("finish zip");
    }

    let snap = ArchiveSnapshotBuilder::default()
        .build(&zip_path)
        .expect("build archive snapshot");

    // 2024-03-15T12:30:20Z
    assert_eq!(snap.records()[0].mtime_secs, 1_710_505_820);
}

#[test]
fn empty_archive_gives_empty_snapshot() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let zip_path = tmp.path().join("empty.zip");
    write_zip(&zip_path, &[("only-a-dir/", None)]);

    let snap = ArchiveSnapshotBuilder::default()
        .build(&zip_path)
        .expect("build archive snapshot");
    assert!(snap.is_empty());
}

#[test]
fn missing_archive_is_archive_read_error() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let zip_path = tmp.path().join("missing.zip");

    let err = ArchiveSnapshotBuilder::default()
        .build(&zip_path)
        .expect_err("missing archive");

    match err {
        SnapshotError::ArchiveRead { archive, entry, .. } => {
            assert_eq!(archive, zip_path);
            assert!(entry.is_none());
        }
        other => panic!("expected ArchiveRead, got {other:?}"),
    }
}

#[test]
fn garbage_file_is_archive_read_error() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let zip_path = tmp.path().join("garbage.zip");
    fs::write(&zip_path, b"this is not a zip container at all").expect("write garbage");

    let err = ArchiveSnapshotBuilder::default()
        .build(&zip_path)
        .expect_err("garbage archive");
    assert!(matches!(err, SnapshotError::ArchiveRead { .. }));
    assert_eq!(err.path(), Some(zip_path.as_path()));
}

#[test]
fn duplicate_entry_names_are_rejected() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let zip_path = tmp.path().join("dupes.zip");
    {
        let mut zip = ZipWriter::new(fs::File::create(&zip_path).expect("create zip"));
        zip.start_file("a.txt", FileOptions::default())
            .expect("start first entry");
        zip.write_all(b"one").expect("write first entry");
        // Some writer versions refuse a repeated name outright.
        if zip.start_file("a.txt", FileOptions::default()).is_err() {
            return;
        }
        zip.write_all(b"two").expect("write second entry");
        zip.finish().expect("finish zip");
    }

    let err = ArchiveSnapshotBuilder::default()
        .build(&zip_path)
        .expect_err("duplicate names");

    match err {
        SnapshotError::ArchiveRead { entry, .. } => assert_eq!(entry.as_deref(), Some("a.txt")),
        other => panic!("expected ArchiveRead, got {other:?}"),
    }
}

fn write_stored_zip(path: &Path, name: &str, body: &[u8]) {
    let mut zip = ZipWriter::new(fs::File::create(path).expect("create zip"));
    let options = FileOptions::default().compression_method(CompressionMethod::Stored);
    zip.start_file(name, options).expect("start entry");
    zip.write_all(body).expect("write entry");
    zip.finish().expect("finish zip");
}

fn find(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .position(|w| w == needle)
        .expect("byte pattern present")
}

#[test]
fn corrupt_entry_data_is_archive_read_naming_the_entry() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let zip_path = tmp.path().join("corrupt.zip");
    write_stored_zip(&zip_path, "a.txt", b"hello world");

    let mut bytes = fs::read(&zip_path).expect("read zip");
    let at = find(&bytes, b"hello world");
    bytes[at] ^= 0xff;
    fs::write(&zip_path, &bytes).expect("rewrite zip");

    let err = ArchiveSnapshotBuilder::default()
        .build(&zip_path)
        .expect_err("checksum mismatch");

    match err {
        SnapshotError::ArchiveRead { archive, entry, .. } => {
            assert_eq!(archive, zip_path);
            assert_eq!(entry.as_deref(), Some("a.txt"));
        }
        other => panic!("expected ArchiveRead, got {other:?}"),
    }
}

#[test]
fn unsupported_method_names_the_entry() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let zip_path = tmp.path().join("method.zip");
    write_stored_zip(&zip_path, "a.txt", b"hello");

    // Compression method 12 (bzip2) is not enabled; patch both headers.
    let mut bytes = fs::read(&zip_path).expect("read zip");
    let local = find(&bytes, b"PK\x03\x04");
    bytes[local + 8..local + 10].copy_from_slice(&12u16.to_le_bytes());
    let central = find(&bytes, b"PK\x01\x02");
    bytes[central + 10..central + 12].copy_from_slice(&12u16.to_le_bytes());
    fs::write(&zip_path, &bytes).expect("rewrite zip");

    let err = ArchiveSnapshotBuilder::default()
        .build(&zip_path)
        .expect_err("unsupported method");

    match err {
        SnapshotError::ArchiveRead { entry, .. } => assert_eq!(entry.as_deref(), Some("a.txt")),
        other => panic!("expected ArchiveRead, got {other:?}"),
    }
}

#[test]
fn dos_time_conversion_handles_epoch_and_default() {
    let epoch = DateTime::from_date_and_time(1980, 1, 1, 0, 0, 0).expect("valid dos time");
    assert_eq!(dos_time_to_unix(epoch), 315_532_800);
    assert_eq!(dos_time_to_unix(DateTime::default()), 315_532_800);
}
