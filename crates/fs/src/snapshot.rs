use crate::record::FileRecord;

/// Immutable list of [`FileRecord`]s sorted ascending by `relative_path`.
///
/// Two logically equal trees always produce the same sequence, whatever
/// order the underlying filesystem or archive enumerated them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    records: Box<[FileRecord]>,
}

impl Snapshot {
    pub fn from_records(mut records: Vec<FileRecord>) -> Self {
        records.sort_unstable_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Self {
            records: records.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileRecord> {
        self.records.iter()
    }

    pub fn get(&self, relative_path: &str) -> Option<&FileRecord> {
        self.records
            .binary_search_by(|r| r.relative_path.as_str().cmp(relative_path))
            .ok()
            .map(|i| &self.records[i])
    }

    /// Same snapshot without directory records.
    ///
    /// Archives never carry directory records, so a directory snapshot is
    /// projected through this before being compared against one.
    pub fn files_only(&self) -> Snapshot {
        Snapshot {
            records: self.records.iter().filter(|r| !r.is_dir).cloned().collect(),
        }
    }

    pub fn total_size(&self) -> u64 {
        self.records.iter().map(|r| r.size).sum()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
