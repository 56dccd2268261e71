// src/errors/compile.rs
//! Bytecode compiler errors (E3xxx).
//!
//! These are fatal: after a clean type check the only expected one is
//! the lambda rejection. Anything else signals a compiler bug.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CompileError {
    #[error("lambda expressions cannot be compiled")]
    #[diagnostic(
        code(E3001),
        help("lambdas are type-checked but the bytecode backend does not support closures")
    )]
    LambdaNotSupported {
        #[label("lambda used here")]
        span: SourceSpan,
    },

    #[error("undefined identifier '{name}' survived type checking")]
    #[diagnostic(code(E3002))]
    UndefinedIdentifier {
        name: String,
        #[label("unresolved")]
        span: SourceSpan,
    },

    #[error("too many constants in one bytecode unit")]
    #[diagnostic(code(E3003))]
    TooManyConstants {
        #[label("constant pool overflow")]
        span: SourceSpan,
    },

    #[error("jump distance exceeds 16-bit range")]
    #[diagnostic(code(E3004))]
    JumpTooFar {
        #[label("jump originates here")]
        span: SourceSpan,
    },
}
