use std::{
    io::{Stderr, Stdout},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Result;
use clap::Args;

use crate::commands::{ScanOptions, fail, load_snapshot};
use crate::printer::{
    ColorChoice, HumanPrinter, JsonPrinter, OutputFormat, PrinterConfig, SnapshotPrintContext,
    SnapshotPrinter,
};

#[derive(Debug, Args)]
pub struct OutputOptions {
    /// Output records as NDJSON (one JSON object per line)
    #[arg(long)]
    pub json: bool,

    /// When to use colors: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: String,

    /// Suppress the totals line
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl OutputOptions {
    pub fn make_printer(&self) -> Box<dyn SnapshotPrinter> {
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        };

        let cfg = PrinterConfig {
            format,
            color: ColorChoice::parse(&self.color),
            show_summary: !self.quiet,
        };

        match cfg.format {
            OutputFormat::Human => Box::new(HumanPrinter::<Stdout, Stderr>::stdout(cfg)),
            OutputFormat::Json => Box::new(JsonPrinter::<Stdout, Stderr>::stdout(cfg)),
        }
    }
}

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Directory to walk, or zip archive to read
    pub path: PathBuf,

    #[command(flatten)]
    pub scan: ScanOptions,

    #[command(flatten)]
    pub output: OutputOptions,
}

pub fn run(args: SnapshotArgs) -> ExitCode {
    match execute(&args) {
        Ok(code) => code,
        Err(e) => fail("snapshot", e),
    }
}

fn execute(args: &SnapshotArgs) -> Result<ExitCode> {
    let (snap, kind) = load_snapshot(&args.path, &args.scan.snapshot_options())?;

    let source = args.path.display().to_string();
    let ctx = SnapshotPrintContext {
        kind: kind.label(),
        source: &source,
    };

    let mut printer = args.output.make_printer();
    printer.print_snapshot(&snap, &ctx)?;

    Ok(ExitCode::SUCCESS)
}
