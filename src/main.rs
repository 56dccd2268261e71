// src/main.rs

use clap::Parser;
use shrew::cli::{Cli, Commands};
use shrew::commands;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file } => commands::run::run_file(&file, cli.verbose),
        Commands::Check { files } => commands::check::check_files(&files, cli.verbose),
        Commands::Inspect { inspect_type, file } => {
            commands::inspect::inspect_file(inspect_type, &file, cli.verbose)
        }
    }
}
