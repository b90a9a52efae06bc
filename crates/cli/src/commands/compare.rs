use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Args;
use ditto_engine::first_difference;
use log::info;

use crate::commands::{EXIT_DIFFERENT, ScanOptions, SourceKind, fail, load_snapshot};

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// Directory or zip archive
    pub left: PathBuf,

    /// Directory or zip archive
    pub right: PathBuf,

    #[command(flatten)]
    pub scan: ScanOptions,
}

pub fn run(args: CompareArgs) -> ExitCode {
    match execute(&args) {
        Ok(code) => code,
        Err(e) => fail("compare", e),
    }
}

fn execute(args: &CompareArgs) -> Result<ExitCode> {
    let opts = args.scan.snapshot_options();
    let (mut left, left_kind) = load_snapshot(&args.left, &opts)?;
    let (mut right, right_kind) = load_snapshot(&args.right, &opts)?;

    // Archives carry no directory records; drop them from both sides.
    if left_kind == SourceKind::Archive || right_kind == SourceKind::Archive {
        left = left.files_only();
        right = right.files_only();
    }

    info!(
        "[compare] {} ({} records) vs {} ({} records)",
        args.left.display(),
        left.len(),
        args.right.display(),
        right.len()
    );

    match first_difference(&left, &right) {
        None => {
            println!("identical");
            Ok(ExitCode::SUCCESS)
        }
        Some(diff) => {
            println!("different: {diff}");
            Ok(ExitCode::from(EXIT_DIFFERENT))
        }
    }
}
