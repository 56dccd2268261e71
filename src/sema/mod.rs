// src/sema/mod.rs
//! Semantic analysis: the type model, symbol table, and two-pass type
//! checker.

pub mod checker;
pub mod methods;
pub mod scope;
pub mod types;

pub use checker::{TypeChecker, TypeError, check_program};
pub use methods::{MethodSig, lookup_method};
pub use scope::{ScopeKind, SymbolInfo, SymbolKind, SymbolTable};
pub use types::{Type, TypeEnvironment, unify};
