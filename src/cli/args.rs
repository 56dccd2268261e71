// src/cli/args.rs

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shrew programming language compiler and runtime
#[derive(Parser)]
#[command(name = "shrew")]
#[command(version = "0.1.0")]
#[command(about = "Shrew programming language", long_about = None)]
pub struct Cli {
    /// Show detailed compilation information
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a Shrew source file
    Run {
        /// Path to the .shrew file to execute
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Check Shrew source files for errors without running them
    Check {
        /// Files to check
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
    },
    /// Inspect compilation output (AST, bytecode)
    Inspect {
        /// What to inspect: ast, bytecode
        #[arg(value_name = "TYPE")]
        inspect_type: InspectType,

        /// File to inspect
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Clone, Debug, ValueEnum)]
pub enum InspectType {
    Ast,
    Bytecode,
}
