// src/commands/inspect.rs

use super::common::{parse_and_check, read_source};
use crate::cli::InspectType;
use crate::compiler::compile_program;
use crate::errors::report::render_to_stderr;
use miette::NamedSource;
use std::path::Path;
use std::process::ExitCode;

/// Print the parsed AST or the compiled bytecode listing.
pub fn inspect_file(inspect_type: InspectType, path: &Path, verbose: bool) -> ExitCode {
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

    match inspect_type {
        InspectType::Ast => {
            println!("{:#?}", analyzed.program);
            ExitCode::SUCCESS
        }
        InspectType::Bytecode => {
            match compile_program(&analyzed.program, &analyzed.interner) {
                Ok(bytecode) => {
                    print!("{}", bytecode.disassemble(&file));
                    ExitCode::SUCCESS
                }
                Err(error) => {
                    let report = miette::Report::new(error)
                        .with_source_code(NamedSource::new(file, source.clone()));
                    render_to_stderr(report.as_ref());
                    ExitCode::FAILURE
                }
            }
        }
    }
}
