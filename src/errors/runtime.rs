// src/errors/runtime.rs
//! Runtime errors raised by the virtual machine.
//!
//! Runtime failures abort the current `call_function` invocation and
//! surface without source locations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("stack underflow")]
    StackUnderflow,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Modulo by zero")]
    ModuloByZero,

    #[error("cannot apply '{op}' to {lhs} and {rhs}")]
    BinaryTypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("cannot apply unary '{op}' to {operand}")]
    UnaryTypeMismatch {
        op: &'static str,
        operand: &'static str,
    },

    #[error("cannot compare {lhs} and {rhs}")]
    CompareKindMismatch {
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("type {ty} does not support ordering comparison")]
    NotOrdered { ty: &'static str },

    #[error("index must be Int, got {found}")]
    IndexNotInt { found: &'static str },

    #[error("{kind} index out of bounds: {index} (size: {len})")]
    IndexOutOfBounds {
        kind: &'static str,
        index: i64,
        len: usize,
    },

    #[error("cannot index into {ty}")]
    NotIndexable { ty: &'static str },

    #[error("function '{name}' not found")]
    FunctionNotFound { name: String },

    #[error("invalid function index: {index}")]
    InvalidFunctionIndex { index: usize },

    #[error("invalid constant index: {index}")]
    InvalidConstant { index: usize },

    #[error("invalid local slot: {index}")]
    InvalidLocal { index: usize },

    #[error("instruction pointer out of bounds: {ip}")]
    IpOutOfBounds { ip: usize },

    #[error("function '{name}' expects {expected} arguments, got {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("function returned without a value")]
    NoReturnValue,

    #[error("unknown opcode: {byte}")]
    UnknownOpcode { byte: u8 },

    #[error("unknown builtin id: {id}")]
    UnknownBuiltin { id: u16 },

    #[error("{name}() expects {expected}")]
    BuiltinArgs {
        name: &'static str,
        expected: &'static str,
    },

    #[error("method name must be a string constant")]
    MethodNameNotString,

    #[error("{receiver} has no method '{method}'")]
    UnknownMethod {
        receiver: &'static str,
        method: String,
    },

    #[error("{receiver}.{method}() expects {expected} arguments, got {found}")]
    MethodArity {
        receiver: &'static str,
        method: String,
        expected: usize,
        found: usize,
    },

    #[error("{receiver}.{method}() expects {expected}")]
    MethodArgType {
        receiver: &'static str,
        method: &'static str,
        expected: &'static str,
    },

    #[error("List.{method}() on empty list")]
    EmptyList { method: &'static str },

    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}
