// src/errors/parser.rs
//! Parser errors (E1xxx).

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("expected expression, found '{found}'")]
    #[diagnostic(code(E1001))]
    ExpectedExpression {
        found: String,
        #[label("expected expression")]
        span: SourceSpan,
    },

    #[error("expected '{expected}', found '{found}'")]
    #[diagnostic(code(E1002))]
    ExpectedToken {
        expected: String,
        found: String,
        #[label("unexpected token")]
        span: SourceSpan,
    },

    #[error("unexpected token '{token}'")]
    #[diagnostic(code(E1003))]
    UnexpectedToken {
        token: String,
        #[label("unexpected")]
        span: SourceSpan,
    },

    #[error("expected type annotation")]
    #[diagnostic(code(E1004))]
    ExpectedType {
        #[label("expected type")]
        span: SourceSpan,
    },

    #[error("expected identifier")]
    #[diagnostic(code(E1005))]
    ExpectedIdentifier {
        #[label("expected identifier")]
        span: SourceSpan,
    },

    #[error("expected pattern")]
    #[diagnostic(
        code(E1006),
        help("patterns are identifiers or parenthesized tuples of patterns")
    )]
    ExpectedPattern {
        #[label("expected pattern")]
        span: SourceSpan,
    },

    #[error("expected 'function' at top level")]
    #[diagnostic(code(E1007), help("only function declarations may appear at the top level"))]
    ExpectedFunction {
        #[label("not a function declaration")]
        span: SourceSpan,
    },

    #[error("{message}")]
    #[diagnostic(code(E1008))]
    InvalidLiteral {
        message: String,
        #[label("invalid literal")]
        span: SourceSpan,
    },
}
