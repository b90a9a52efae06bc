use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Args;
use ditto_engine::{DirArchiveLister, IncrementalResolver, ResolverOptions};
use ditto_runtime::DEFAULT_INCREMENTAL_MARKER;
use log::warn;

use crate::commands::{EXIT_DIFFERENT, ScanOptions, fail};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Live directory to check
    pub dir: PathBuf,

    /// Directory holding the backup archives
    #[arg(long, short = 'a', value_name = "DIR")]
    pub archives: PathBuf,

    /// File-stem fragment that marks an archive as incremental
    #[arg(long, value_name = "MARKER", default_value = DEFAULT_INCREMENTAL_MARKER)]
    pub incremental_marker: String,

    #[command(flatten)]
    pub scan: ScanOptions,
}

pub fn run(args: CheckArgs) -> ExitCode {
    match execute(&args) {
        Ok(code) => code,
        Err(e) => fail("check", e),
    }
}

fn execute(args: &CheckArgs) -> Result<ExitCode> {
    let lister = DirArchiveLister::new(args.incremental_marker.as_str());
    let options = ResolverOptions {
        snapshot: args.scan.snapshot_options(),
    };

    let resolution = IncrementalResolver::new(lister, options)?
        .resolve(&args.dir, &args.archives)
        .with_context(|| {
            format!(
                "Failed to check {} against {}",
                args.dir.display(),
                args.archives.display()
            )
        })?;

    for skipped in &resolution.skipped {
        warn!("[check] skipped {}: {}", skipped.path.display(), skipped.reason);
        eprintln!(
            "[check] skipped {}: {}",
            skipped.path.display(),
            skipped.reason
        );
    }

    let Some(baseline) = resolution.matched_path() else {
        println!("no baseline: no full archive in {}", args.archives.display());
        return Ok(ExitCode::from(EXIT_DIFFERENT));
    };

    if resolution.identical {
        println!("identical to {}", baseline.display());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("changed since {}", baseline.display());
        Ok(ExitCode::from(EXIT_DIFFERENT))
    }
}
