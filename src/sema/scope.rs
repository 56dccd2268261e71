// src/sema/scope.rs

use crate::frontend::{Span, Symbol};
use crate::sema::Type;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Parameter,
    Function,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
    Lambda,
}

/// A declared name with its type and declaration site
#[derive(Debug, Clone)]
pub struct SymbolInfo {
    pub name: Symbol,
    pub kind: SymbolKind,
    pub ty: Type,
    pub declared_at: Span,
    pub is_mutable: bool,
}

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    symbols: FxHashMap<Symbol, SymbolInfo>,
    parent: Option<usize>,
}

/// Lexically scoped symbol table.
///
/// Scopes live in an arena indexed by id; exiting a scope only moves
/// the current pointer back to the parent, so exited scopes remain
/// available for inspection.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                kind: ScopeKind::Global,
                symbols: FxHashMap::default(),
                parent: None,
            }],
            current: 0,
        }
    }

    pub fn enter_scope(&mut self, kind: ScopeKind) {
        let scope = Scope {
            kind,
            symbols: FxHashMap::default(),
            parent: Some(self.current),
        };
        self.scopes.push(scope);
        self.current = self.scopes.len() - 1;
    }

    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    pub fn current_scope_kind(&self) -> ScopeKind {
        self.scopes[self.current].kind
    }

    /// Declare a name in the current scope. Fails (returns false) if
    /// the name already exists in this scope; shadowing an outer scope
    /// is allowed.
    pub fn declare(
        &mut self,
        name: Symbol,
        kind: SymbolKind,
        ty: Type,
        declared_at: Span,
    ) -> bool {
        let scope = &mut self.scopes[self.current];
        if scope.symbols.contains_key(&name) {
            return false;
        }
        scope.symbols.insert(
            name,
            SymbolInfo {
                name,
                kind,
                ty,
                declared_at,
                is_mutable: false,
            },
        );
        true
    }

    /// Look a name up, walking the parent chain outward.
    pub fn lookup(&self, name: Symbol) -> Option<&SymbolInfo> {
        let mut scope = &self.scopes[self.current];
        loop {
            if let Some(info) = scope.symbols.get(&name) {
                return Some(info);
            }
            match scope.parent {
                Some(parent) => scope = &self.scopes[parent],
                None => return None,
            }
        }
    }

    pub fn exists_in_current_scope(&self, name: Symbol) -> bool {
        self.scopes[self.current].symbols.contains_key(&name)
    }

    pub fn scope_depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = &self.scopes[self.current];
        while let Some(parent) = scope.parent {
            depth += 1;
            scope = &self.scopes[parent];
        }
        depth
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Span;

    fn sym(id: u32) -> Symbol {
        Symbol(id)
    }

    #[test]
    fn declare_and_lookup_in_global_scope() {
        let mut table = SymbolTable::new();
        assert!(table.declare(sym(0), SymbolKind::Variable, Type::Int, Span::default()));

        let info = table.lookup(sym(0)).expect("symbol should exist");
        assert_eq!(info.kind, SymbolKind::Variable);
        assert!(info.ty.equals(&Type::Int));
    }

    #[test]
    fn redeclaration_in_same_scope_fails() {
        let mut table = SymbolTable::new();
        assert!(table.declare(sym(0), SymbolKind::Variable, Type::Int, Span::default()));
        assert!(!table.declare(sym(0), SymbolKind::Variable, Type::Float, Span::default()));
    }

    #[test]
    fn shadowing_across_scopes_is_allowed() {
        let mut table = SymbolTable::new();
        assert!(table.declare(sym(0), SymbolKind::Variable, Type::Int, Span::default()));

        table.enter_scope(ScopeKind::Block);
        assert!(table.declare(sym(0), SymbolKind::Variable, Type::String, Span::default()));

        // The inner declaration shadows the outer one
        assert!(table.lookup(sym(0)).unwrap().ty.equals(&Type::String));

        table.exit_scope();
        assert!(table.lookup(sym(0)).unwrap().ty.equals(&Type::Int));
    }

    #[test]
    fn lookup_walks_parent_chain() {
        let mut table = SymbolTable::new();
        table.declare(sym(0), SymbolKind::Function, Type::Bool, Span::default());

        table.enter_scope(ScopeKind::Function);
        table.enter_scope(ScopeKind::Block);

        assert!(table.lookup(sym(0)).is_some());
        assert!(table.lookup(sym(1)).is_none());
    }

    #[test]
    fn exists_in_current_scope_ignores_parents() {
        let mut table = SymbolTable::new();
        table.declare(sym(0), SymbolKind::Variable, Type::Int, Span::default());

        table.enter_scope(ScopeKind::Block);
        assert!(!table.exists_in_current_scope(sym(0)));
        assert!(table.lookup(sym(0)).is_some());
    }

    #[test]
    fn scope_depth_tracks_nesting() {
        let mut table = SymbolTable::new();
        assert_eq!(table.scope_depth(), 0);

        table.enter_scope(ScopeKind::Function);
        assert_eq!(table.scope_depth(), 1);
        assert_eq!(table.current_scope_kind(), ScopeKind::Function);

        table.enter_scope(ScopeKind::Lambda);
        assert_eq!(table.scope_depth(), 2);

        table.exit_scope();
        table.exit_scope();
        assert_eq!(table.scope_depth(), 0);
        assert_eq!(table.current_scope_kind(), ScopeKind::Global);
    }

    #[test]
    fn exit_scope_at_global_is_a_no_op() {
        let mut table = SymbolTable::new();
        table.exit_scope();
        assert_eq!(table.scope_depth(), 0);
    }
}
