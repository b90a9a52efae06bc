use super::*;

#[test]
fn empty_set_excludes_nothing() {
    let set = ExcludeSet::default();
    assert!(set.is_empty());
    assert!(!set.is_excluded("a.txt", false));
    assert!(!set.is_excluded("sub", true));
}

#[test]
fn blank_patterns_are_dropped() {
    let set = ExcludeSet::new(["", "   ", "*.log"]).expect("build exclude set");
    assert_eq!(set.len(), 1);
}

#[test]
fn directory_pattern_matches_dirs_and_their_contents() {
    let set = ExcludeSet::new(["sub/"]).expect("build exclude set");

    assert!(
        set.is_excluded("sub", true),
        "'sub/' should match the directory itself",
    );
    assert!(
        set.is_excluded("sub/b.txt", false),
        "'sub/' should cover files beneath it",
    );
    assert!(
        !set.is_excluded("sub", false),
        "'sub/' should not match a regular file named sub",
    );
    assert!(!set.is_excluded("a.txt", false));
}

#[test]
fn unanchored_glob_matches_at_any_depth() {
    let set = ExcludeSet::new(["*.log"]).expect("build exclude set");

    assert!(set.is_excluded("debug.log", false));
    assert!(set.is_excluded("deep/nested/run.log", false));
    assert!(!set.is_excluded("log.txt", false));
}

#[test]
fn leading_slash_anchors_to_root() {
    let set = ExcludeSet::new(["/build"]).expect("build exclude set");

    assert!(set.is_excluded("build", true));
    assert!(!set.is_excluded("src/build", true));
}

#[test]
fn first_match_wins_in_supplied_order() {
    // The re-include comes first, so it decides keep.txt.
    let keep_first = ExcludeSet::new(["!keep.txt", "*.txt"]).expect("build exclude set");
    assert!(!keep_first.is_excluded("keep.txt", false));
    assert!(keep_first.is_excluded("other.txt", false));

    // Reversed, the broad exclusion is reached first.
    let exclude_first = ExcludeSet::new(["*.txt", "!keep.txt"]).expect("build exclude set");
    assert!(exclude_first.is_excluded("keep.txt", false));
}

#[test]
fn excluded_by_reports_the_deciding_pattern() {
    let set = ExcludeSet::new(["*.tmp", "cache/", "*.bin"]).expect("build exclude set");

    assert_eq!(set.excluded_by("cache", true), Some("cache/"));
    assert_eq!(set.excluded_by("x.bin", false), Some("*.bin"));
    assert_eq!(set.excluded_by("readme.md", false), None);
}

#[test]
fn invalid_glob_is_reported_with_its_pattern() {
    let err = ExcludeSet::new(["ok/", "bad[", "*.log"]).expect_err("unclosed class must fail");

    match err {
        SnapshotError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "bad["),
        other => panic!("expected InvalidPattern, got {other:?}"),
    }
}
