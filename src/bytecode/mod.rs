// src/bytecode/mod.rs
//! The bytecode model: opcodes, builtin ids, and the compiled program
//! structure with its constant pool and function table.

pub mod opcode;
pub mod program;

pub use opcode::{BuiltinId, Op};
pub use program::{Bytecode, FunctionInfo};
