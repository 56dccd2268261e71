// src/errors/sema.rs
//! Semantic analysis errors (E2xxx).

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum SemanticError {
    #[error("type mismatch: expected '{expected}', got '{found}'")]
    #[diagnostic(code(E2001))]
    TypeMismatch {
        expected: String,
        found: String,
        #[label("type mismatch")]
        span: SourceSpan,
    },

    #[error("undefined variable '{name}'")]
    #[diagnostic(code(E2002))]
    UndefinedVariable {
        name: String,
        #[label("not found in scope")]
        span: SourceSpan,
    },

    #[error("undefined function '{name}'")]
    #[diagnostic(code(E2003))]
    UndefinedFunction {
        name: String,
        #[label("no function with this name")]
        span: SourceSpan,
    },

    #[error("'{name}' is not a function")]
    #[diagnostic(code(E2004))]
    NotCallable {
        name: String,
        #[label("not callable")]
        span: SourceSpan,
    },

    #[error("function '{name}' expects {expected} arguments, got {found}")]
    #[diagnostic(code(E2005))]
    WrongArgumentCount {
        name: String,
        expected: usize,
        found: usize,
        #[label("wrong number of arguments")]
        span: SourceSpan,
    },

    #[error("'{name}' is already declared in this scope")]
    #[diagnostic(code(E2006))]
    Redeclaration {
        name: String,
        #[label("redeclared here")]
        span: SourceSpan,
    },

    #[error("only function names can be called")]
    #[diagnostic(code(E2007), help("indirect calls through values are not supported"))]
    CalleeNotIdentifier {
        #[label("callee must be a function name")]
        span: SourceSpan,
    },

    #[error("arithmetic operator requires numeric type, got '{found}'")]
    #[diagnostic(code(E2008))]
    ArithmeticNotNumeric {
        found: String,
        #[label("expected Int or Float")]
        span: SourceSpan,
    },

    #[error("ordering comparison requires numeric types")]
    #[diagnostic(code(E2009))]
    OrderingNotNumeric {
        #[label("operands must be Int or Float")]
        span: SourceSpan,
    },

    #[error("type '{receiver}' has no method '{method}'")]
    #[diagnostic(code(E2010))]
    UnknownMethod {
        receiver: String,
        method: String,
        #[label("unknown method")]
        span: SourceSpan,
    },

    #[error("method '{method}' expects {expected} arguments, got {found}")]
    #[diagnostic(code(E2011))]
    MethodArgumentCount {
        method: String,
        expected: usize,
        found: usize,
        #[label("wrong number of arguments")]
        span: SourceSpan,
    },

    #[error("cannot index into type '{found}'")]
    #[diagnostic(code(E2012))]
    NotIndexable {
        found: String,
        #[label("only List and Tuple can be indexed")]
        span: SourceSpan,
    },

    #[error("tuple index {index} out of bounds (tuple has {len} elements)")]
    #[diagnostic(code(E2013))]
    TupleIndexOutOfBounds {
        index: i64,
        len: usize,
        #[label("out of bounds")]
        span: SourceSpan,
    },

    #[error("tuple indexing requires a constant integer literal index")]
    #[diagnostic(code(E2014), help("tuple element types differ, so the index must be known statically"))]
    TupleIndexNotLiteral {
        #[label("not a literal index")]
        span: SourceSpan,
    },

    #[error("cannot destructure non-tuple type '{found}' with tuple pattern")]
    #[diagnostic(code(E2015))]
    DestructureNonTuple {
        found: String,
        #[label("initializer is not a tuple")]
        span: SourceSpan,
    },

    #[error("tuple pattern has {found} elements but type has {expected} elements")]
    #[diagnostic(code(E2016))]
    PatternArityMismatch {
        expected: usize,
        found: usize,
        #[label("pattern arity mismatch")]
        span: SourceSpan,
    },

    #[error("if expression branches have incompatible types: '{then_type}' and '{else_type}'")]
    #[diagnostic(code(E2017))]
    BranchTypeMismatch {
        then_type: String,
        else_type: String,
        #[label("branch types must match")]
        span: SourceSpan,
    },

    #[error("return statement outside of function")]
    #[diagnostic(code(E2018))]
    ReturnOutsideFunction {
        #[label("not inside a function")]
        span: SourceSpan,
    },
}
