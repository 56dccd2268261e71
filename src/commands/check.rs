// src/commands/check.rs

use super::common::{parse_and_check, read_source};
use std::path::PathBuf;
use std::process::ExitCode;

/// Check source files for errors without running them.
pub fn check_files(files: &[PathBuf], verbose: bool) -> ExitCode {
    let mut failed = false;

    for path in files {
        match read_source(path) {
            Ok((source, file)) => {
                if parse_and_check(&source, &file, verbose).is_ok() {
                    println!("{}: ok", file);
                } else {
                    failed = true;
                }
            }
            Err(message) => {
                eprintln!("error: {}", message);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
