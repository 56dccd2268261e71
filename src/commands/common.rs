// src/commands/common.rs
//! The shared front half of every command: read a file, lex, parse,
//! and type check, rendering all diagnostics to stderr.

use crate::errors::report::render_to_stderr;
use crate::frontend::{Interner, Lexer, Parser, Program};
use crate::sema::check_program;
use miette::NamedSource;
use std::fs;
use std::path::Path;

/// A parsed and type-checked program with its interner.
pub struct Analyzed {
    pub program: Program,
    pub interner: Interner,
}

/// Read a source file; returns (source, display path).
pub fn read_source(path: &Path) -> Result<(String, String), String> {
    let source = fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    Ok((source, path.to_string_lossy().to_string()))
}

/// Lex, parse, and type check. Every diagnostic is rendered to stderr;
/// Err(()) means at least one was fatal.
pub fn parse_and_check(source: &str, file: &str, verbose: bool) -> Result<Analyzed, ()> {
    // Lex
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize();
    let lex_errors = lexer.take_errors();

    if verbose {
        eprintln!("[shrew] lexed {} tokens", tokens.len());
    }

    let lex_failed = !lex_errors.is_empty();
    for error in lex_errors {
        let report = miette::Report::new(error)
            .with_source_code(NamedSource::new(file, source.to_string()));
        render_to_stderr(report.as_ref());
    }
    if lex_failed {
        return Err(());
    }

    // Parse
    let result = Parser::new(tokens).parse();

    let parse_failed = !result.errors.is_empty();
    for error in result.errors {
        let report = miette::Report::new(error.error)
            .with_source_code(NamedSource::new(file, source.to_string()));
        render_to_stderr(report.as_ref());
    }
    let Some(program) = result.program else {
        return Err(());
    };
    if parse_failed {
        return Err(());
    }

    if verbose {
        eprintln!("[shrew] parsed {} functions", program.functions.len());
    }

    // Type check
    if let Err(errors) = check_program(&program, &result.interner) {
        for error in errors {
            let report = miette::Report::new(error.error)
                .with_source_code(NamedSource::new(file, source.to_string()));
            render_to_stderr(report.as_ref());
        }
        return Err(());
    }

    if verbose {
        eprintln!("[shrew] type check passed");
    }

    Ok(Analyzed {
        program,
        interner: result.interner,
    })
}
