use std::process::ExitCode;

use clap::Parser;

mod commands;
mod printer;

use commands::{Cli, Command};
use ditto_runtime::logging;

fn main() -> ExitCode {
    logging::init().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::Snapshot(args) => commands::snapshot::run(args),
        Command::Compare(args) => commands::compare::run(args),
        Command::Check(args) => commands::check::run(args),
    }
}
