//! Strict lockstep comparison of two canonically sorted snapshots.
//!
//! Both builders emit records sorted by relative path, so the walk is a single
//! pass with no auxiliary maps. Modification times never take part.

use std::fmt;

use ditto_fs::{FileRecord, Snapshot};

/// The first point at which two snapshots diverge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    LengthMismatch { left: usize, right: usize },
    PathMismatch { index: usize, left: String, right: String },
    KindMismatch { path: String, left_is_dir: bool },
    SizeMismatch { path: String, left: u64, right: u64 },
    ContentMismatch { path: String },
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::LengthMismatch { left, right } => {
                write!(f, "entry count differs: {left} vs {right}")
            }
            Difference::PathMismatch { index, left, right } => {
                write!(f, "entry #{index} differs: {left} vs {right}")
            }
            Difference::KindMismatch { path, left_is_dir } => {
                let (l, r) = if *left_is_dir {
                    ("directory", "file")
                } else {
                    ("file", "directory")
                };
                write!(f, "{path}: {l} vs {r}")
            }
            Difference::SizeMismatch { path, left, right } => {
                write!(f, "{path}: size {left} vs {right}")
            }
            Difference::ContentMismatch { path } => write!(f, "{path}: content differs"),
        }
    }
}

/// First mismatch between `a` and `b`, or `None` if they are identical.
pub fn first_difference(a: &Snapshot, b: &Snapshot) -> Option<Difference> {
    if a.len() != b.len() {
        return Some(Difference::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    a.iter()
        .zip(b.iter())
        .enumerate()
        .find_map(|(index, (l, r))| compare_records(index, l, r))
}

fn compare_records(index: usize, l: &FileRecord, r: &FileRecord) -> Option<Difference> {
    if l.relative_path != r.relative_path {
        return Some(Difference::PathMismatch {
            index,
            left: l.relative_path.clone(),
            right: r.relative_path.clone(),
        });
    }
    if l.is_dir != r.is_dir {
        return Some(Difference::KindMismatch {
            path: l.relative_path.clone(),
            left_is_dir: l.is_dir,
        });
    }
    if l.size != r.size {
        return Some(Difference::SizeMismatch {
            path: l.relative_path.clone(),
            left: l.size,
            right: r.size,
        });
    }
    if !l.is_dir && l.content_hash != r.content_hash {
        return Some(Difference::ContentMismatch {
            path: l.relative_path.clone(),
        });
    }
    None
}

#[inline]
pub fn snapshots_identical(a: &Snapshot, b: &Snapshot) -> bool {
    first_difference(a, b).is_none()
}

/// Compare a live directory snapshot against an archive snapshot.
///
/// Archives hold no directory records, so the directory side is reduced to
/// its files first.
pub fn directory_matches_archive(dir: &Snapshot, archive: &Snapshot) -> bool {
    snapshots_identical(&dir.files_only(), archive)
}

#[cfg(test)]
#[path = "compare_tests.rs"]
mod tests;
