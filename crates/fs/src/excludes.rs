use std::path::Path;

use ignore::{
    Match,
    gitignore::{Gitignore, GitignoreBuilder},
};

use crate::error::{Result, SnapshotError};

/// One pattern compiled to its own matcher so evaluation order is kept.
#[derive(Debug)]
struct ExcludeRule {
    pattern: String,
    matcher: Gitignore,
}

/// Ordered gitignore-style exclusion rules, matched against root-relative
/// forward-slash paths. The first rule that matches an entry decides it:
/// a plain pattern excludes, a `!pattern` keeps.
#[derive(Debug, Default)]
pub struct ExcludeSet {
    rules: Vec<ExcludeRule>,
}

impl ExcludeSet {
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .filter(|p| !p.as_ref().trim().is_empty())
            .map(|p| compile(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Pattern that excludes `rel_path`, if any.
    ///
    /// Parent directories are considered too, so `sub/` also covers
    /// `sub/b.txt` when the path is tested on its own.
    pub fn excluded_by(&self, rel_path: &str, is_dir: bool) -> Option<&str> {
        let path = Path::new(rel_path);
        for rule in &self.rules {
            match rule.matcher.matched_path_or_any_parents(path, is_dir) {
                Match::None => continue,
                Match::Ignore(_) => return Some(&rule.pattern),
                Match::Whitelist(_) => return None,
            }
        }
        None
    }

    #[cfg(test)]
    pub(crate) fn is_excluded(&self, rel_path: &str, is_dir: bool) -> bool {
        self.excluded_by(rel_path, is_dir).is_some()
    }
}

fn compile(pattern: &str) -> Result<ExcludeRule> {
    let invalid = |source| SnapshotError::InvalidPattern {
        pattern: pattern.to_owned(),
        source,
    };

    // Paths handed to the matcher are already root-relative, so the matcher
    // root is `.` and nothing gets stripped.
    let mut builder = GitignoreBuilder::new(Path::new("."));
    builder.add_line(None, pattern).map_err(invalid)?;
    let matcher = builder.build().map_err(invalid)?;

    Ok(ExcludeRule {
        pattern: pattern.to_owned(),
        matcher,
    })
}

#[cfg(test)]
#[path = "excludes_tests.rs"]
mod tests;
