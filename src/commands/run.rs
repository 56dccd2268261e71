// src/commands/run.rs

use super::common::{parse_and_check, read_source};
use crate::compiler::compile_program;
use crate::errors::report::render_to_stderr;
use crate::runtime::{Value, Vm};
use miette::NamedSource;
use std::path::Path;
use std::process::ExitCode;

/// Run a Shrew source file: full pipeline, then call main().
///
/// A main returning Int becomes the process exit status; other return
/// types exit 0. Any pipeline or runtime error exits 1.
pub fn run_file(path: &Path, verbose: bool) -> ExitCode {
    let (source, file) = match read_source(path) {
        Ok(pair) => pair,
        Err(message) => {
            eprintln!("error: {}", message);
            return ExitCode::FAILURE;
        }
    };

    let Ok(analyzed) = parse_and_check(&source, &file, verbose) else {
        return ExitCode::FAILURE;
    };

    let bytecode = match compile_program(&analyzed.program, &analyzed.interner) {
        Ok(bytecode) => bytecode,
        Err(error) => {
            let report = miette::Report::new(error)
                .with_source_code(NamedSource::new(file, source.clone()));
            render_to_stderr(report.as_ref());
            return ExitCode::FAILURE;
        }
    };

    if verbose {
        eprintln!(
            "[shrew] compiled {} bytes, {} constants, {} functions",
            bytecode.instructions.len(),
            bytecode.constants.len(),
            bytecode.function_count()
        );
    }

    let mut vm = Vm::new();
    match vm.call_function(&bytecode, "main", vec![]) {
        Ok(Value::Int(status)) => ExitCode::from(status as u8),
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("runtime error: {}", error);
            ExitCode::FAILURE
        }
    }
}
