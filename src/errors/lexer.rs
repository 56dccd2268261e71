// src/errors/lexer.rs
//! Lexer errors (E0xxx).

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum LexerError {
    #[error("unexpected character '{ch}'")]
    #[diagnostic(code(E0001))]
    UnexpectedCharacter {
        ch: char,
        #[label("unexpected character")]
        span: SourceSpan,
    },

    #[error("unterminated string literal")]
    #[diagnostic(code(E0002), help("add a closing '\"' to terminate the string"))]
    UnterminatedString {
        #[label("string starts here")]
        span: SourceSpan,
    },

    #[error("invalid integer literal")]
    #[diagnostic(code(E0003), help("integer literals must fit in a signed 64-bit value"))]
    InvalidInt {
        #[label("invalid integer")]
        span: SourceSpan,
    },

    #[error("invalid float literal")]
    #[diagnostic(code(E0004))]
    InvalidFloat {
        #[label("invalid float")]
        span: SourceSpan,
    },

    #[error("invalid exponent in number literal")]
    #[diagnostic(code(E0005), help("an exponent needs at least one digit, e.g. 1e10"))]
    InvalidExponent {
        #[label("exponent starts here")]
        span: SourceSpan,
    },
}
