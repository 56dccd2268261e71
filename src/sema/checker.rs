// src/sema/checker.rs

use crate::errors::SemanticError;
use crate::frontend::{Interner, Span, ast::*};
use crate::sema::methods::lookup_method;
use crate::sema::scope::{ScopeKind, SymbolKind, SymbolTable};
use crate::sema::{Type, TypeEnvironment};

/// A type error wrapping a miette-enabled SemanticError
#[derive(Debug, Clone)]
pub struct TypeError {
    pub error: SemanticError,
    pub span: Span,
}

impl TypeError {
    pub fn new(error: SemanticError, span: Span) -> Self {
        Self { error, span }
    }
}

/// Per-function checking state: the declared return type that return
/// statements are checked against.
struct FnContext {
    return_type: Type,
}

pub struct TypeChecker<'a> {
    interner: &'a Interner,
    symbols: SymbolTable,
    fn_ctx: Option<FnContext>,
    errors: Vec<TypeError>,
}

/// Type check a whole program. All errors are accumulated; the result
/// is Err only if at least one error was found.
pub fn check_program(program: &Program, interner: &Interner) -> Result<(), Vec<TypeError>> {
    TypeChecker::new(interner).check(program)
}

impl<'a> TypeChecker<'a> {
    pub fn new(interner: &'a Interner) -> Self {
        Self {
            interner,
            symbols: SymbolTable::new(),
            fn_ctx: None,
            errors: Vec::new(),
        }
    }

    fn add_error(&mut self, error: SemanticError, span: Span) {
        self.errors.push(TypeError::new(error, span));
    }

    /// Record a mismatch unless either side is Unknown: an Unknown
    /// type means an error was already reported for that expression,
    /// and piling on would only bury the cause.
    fn expect_equal(&mut self, expected: &Type, found: &Type, span: Span) {
        if expected.is_unknown() || found.is_unknown() {
            return;
        }
        if !expected.equals(found) {
            self.add_error(
                SemanticError::TypeMismatch {
                    expected: expected.to_string(),
                    found: found.to_string(),
                    span: span.into(),
                },
                span,
            );
        }
    }

    fn check(mut self, program: &Program) -> Result<(), Vec<TypeError>> {
        // First pass: collect all function signatures into the global
        // scope so bodies can call forward.
        for func in &program.functions {
            let params: Vec<Type> = func.params.iter().map(|p| self.resolve_type(&p.ty)).collect();
            let return_type = self.resolve_type(&func.return_type);

            let func_type = Type::Function {
                params,
                return_type: Box::new(return_type),
            };

            if !self
                .symbols
                .declare(func.name, SymbolKind::Function, func_type, func.span)
            {
                self.add_error(
                    SemanticError::Redeclaration {
                        name: self.interner.resolve(func.name).to_string(),
                        span: func.span.into(),
                    },
                    func.span,
                );
            }
        }

        // Second pass: check every function body. Errors in one
        // function never stop the others from being checked.
        for func in &program.functions {
            self.check_function(func);
        }

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    fn check_function(&mut self, func: &FuncDecl) {
        self.symbols.enter_scope(ScopeKind::Function);

        let return_type = self.resolve_type(&func.return_type);
        self.fn_ctx = Some(FnContext { return_type });

        for param in &func.params {
            let param_type = self.resolve_type(&param.ty);
            if !self
                .symbols
                .declare(param.name, SymbolKind::Parameter, param_type, param.span)
            {
                self.add_error(
                    SemanticError::Redeclaration {
                        name: self.interner.resolve(param.name).to_string(),
                        span: param.span.into(),
                    },
                    param.span,
                );
            }
        }

        // The body type itself is not compared against the return
        // type: functions return through explicit return statements,
        // each checked at its own site.
        self.check_block(&func.body);

        self.symbols.exit_scope();
        self.fn_ctx = None;
    }

    /// Convert a syntactic type annotation to a semantic type.
    /// Unrecognized names become Unknown.
    fn resolve_type(&self, ty: &TypeExpr) -> Type {
        match ty {
            TypeExpr::Named { name, .. } => {
                TypeEnvironment::builtin(self.interner.resolve(*name)).unwrap_or(Type::Unknown)
            }
            TypeExpr::List { element, .. } => Type::List(Box::new(self.resolve_type(element))),
            TypeExpr::Tuple { elements, .. } => {
                Type::Tuple(elements.iter().map(|e| self.resolve_type(e)).collect())
            }
        }
    }

    // ===== Statements =====

    fn check_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Let(let_stmt) => self.check_let(let_stmt),
            Stmt::Return(ret) => self.check_return(ret),
            Stmt::Expr(expr_stmt) => {
                self.check_expr(&expr_stmt.expr);
            }
        }
    }

    fn check_let(&mut self, let_stmt: &LetStmt) {
        let init_type = self.check_expr(&let_stmt.init);

        // An annotation wins for recovery: the bound variable gets the
        // declared type even when the initializer disagrees.
        let bound_type = match &let_stmt.ty {
            Some(annotation) => {
                let declared = self.resolve_type(annotation);
                self.expect_equal(&declared, &init_type, let_stmt.init.span);
                declared
            }
            None => init_type,
        };

        self.check_pattern(&let_stmt.pattern, &bound_type);
    }

    fn check_pattern(&mut self, pattern: &Pattern, expected: &Type) {
        match pattern {
            Pattern::Ident { name, span } => {
                if !self
                    .symbols
                    .declare(*name, SymbolKind::Variable, expected.clone(), *span)
                {
                    self.add_error(
                        SemanticError::Redeclaration {
                            name: self.interner.resolve(*name).to_string(),
                            span: (*span).into(),
                        },
                        *span,
                    );
                }
            }

            Pattern::Tuple { elements, span } => match expected {
                Type::Tuple(element_types) => {
                    if elements.len() != element_types.len() {
                        self.add_error(
                            SemanticError::PatternArityMismatch {
                                expected: element_types.len(),
                                found: elements.len(),
                                span: (*span).into(),
                            },
                            *span,
                        );
                        return;
                    }
                    for (sub_pattern, sub_type) in elements.iter().zip(element_types.iter()) {
                        self.check_pattern(sub_pattern, sub_type);
                    }
                }
                Type::Unknown => {
                    // Initializer already failed; bind every name so
                    // later uses do not cascade into undefined errors.
                    for sub_pattern in elements {
                        self.check_pattern(sub_pattern, &Type::Unknown);
                    }
                }
                other => {
                    self.add_error(
                        SemanticError::DestructureNonTuple {
                            found: other.to_string(),
                            span: (*span).into(),
                        },
                        *span,
                    );
                }
            },
        }
    }

    fn check_return(&mut self, ret: &ReturnStmt) {
        let value_type = self.check_expr(&ret.value);

        match &self.fn_ctx {
            Some(ctx) => {
                let return_type = ctx.return_type.clone();
                self.expect_equal(&return_type, &value_type, ret.value.span);
            }
            None => {
                self.add_error(
                    SemanticError::ReturnOutsideFunction {
                        span: ret.span.into(),
                    },
                    ret.span,
                );
            }
        }
    }

    // ===== Expressions =====

    fn check_expr(&mut self, expr: &Expr) -> Type {
        match &expr.kind {
            ExprKind::IntLiteral(_) => Type::Int,
            ExprKind::FloatLiteral(_) => Type::Float,
            ExprKind::StringLiteral(_) => Type::String,
            ExprKind::BoolLiteral(_) => Type::Bool,

            ExprKind::Identifier(name) => match self.symbols.lookup(*name) {
                Some(info) => info.ty.clone(),
                None => {
                    self.add_error(
                        SemanticError::UndefinedVariable {
                            name: self.interner.resolve(*name).to_string(),
                            span: expr.span.into(),
                        },
                        expr.span,
                    );
                    Type::Unknown
                }
            },

            ExprKind::Tuple(elements) => {
                let element_types = elements.iter().map(|e| self.check_expr(e)).collect();
                Type::Tuple(element_types)
            }

            ExprKind::List(elements) => self.check_list(elements),

            ExprKind::Binary(binary) => self.check_binary(binary),

            ExprKind::Unary(unary) => self.check_unary(unary),

            ExprKind::Call(call) => self.check_call(call, expr.span),

            ExprKind::MethodCall(method_call) => self.check_method_call(method_call),

            ExprKind::Index(index) => self.check_index(index, expr.span),

            ExprKind::Lambda(lambda) => self.check_lambda(lambda, expr.span),

            ExprKind::If(if_expr) => self.check_if(if_expr),

            ExprKind::Block(block) => self.check_block(block),
        }
    }

    fn check_list(&mut self, elements: &[Expr]) -> Type {
        let Some(first) = elements.first() else {
            // Empty list: element type is unknown until used
            return Type::List(Box::new(Type::Unknown));
        };

        let first_type = self.check_expr(first);

        for element in &elements[1..] {
            let element_type = self.check_expr(element);
            self.expect_equal(&first_type, &element_type, element.span);
        }

        Type::List(Box::new(first_type))
    }

    fn check_binary(&mut self, binary: &BinaryExpr) -> Type {
        let left = self.check_expr(&binary.left);
        let right = self.check_expr(&binary.right);

        if binary.op.is_arithmetic() {
            if !left.is_numeric() {
                if !left.is_unknown() {
                    self.add_error(
                        SemanticError::ArithmeticNotNumeric {
                            found: left.to_string(),
                            span: binary.left.span.into(),
                        },
                        binary.left.span,
                    );
                }
                return Type::Unknown;
            }
            if !right.is_numeric() {
                if !right.is_unknown() {
                    self.add_error(
                        SemanticError::ArithmeticNotNumeric {
                            found: right.to_string(),
                            span: binary.right.span.into(),
                        },
                        binary.right.span,
                    );
                }
                return Type::Unknown;
            }

            // Numeric promotion: Float wins
            if matches!(left, Type::Float) || matches!(right, Type::Float) {
                return Type::Float;
            }
            return Type::Int;
        }

        if binary.op.is_ordering() {
            let left_bad = !left.is_numeric() && !left.is_unknown();
            let right_bad = !right.is_numeric() && !right.is_unknown();
            if left_bad || right_bad {
                let span = binary.left.span.merge(binary.right.span);
                self.add_error(
                    SemanticError::OrderingNotNumeric { span: span.into() },
                    span,
                );
            }
            return Type::Bool;
        }

        if binary.op.is_equality() {
            self.expect_equal(&left, &right, binary.right.span);
            return Type::Bool;
        }

        // Logical: both sides must be Bool
        self.expect_equal(&Type::Bool, &left, binary.left.span);
        self.expect_equal(&Type::Bool, &right, binary.right.span);
        Type::Bool
    }

    fn check_unary(&mut self, unary: &UnaryExpr) -> Type {
        let operand = self.check_expr(&unary.operand);

        match unary.op {
            UnaryOp::Neg | UnaryOp::Pos => {
                if !operand.is_numeric() {
                    if !operand.is_unknown() {
                        self.add_error(
                            SemanticError::ArithmeticNotNumeric {
                                found: operand.to_string(),
                                span: unary.operand.span.into(),
                            },
                            unary.operand.span,
                        );
                    }
                    return Type::Unknown;
                }
                operand
            }
            UnaryOp::Not => {
                self.expect_equal(&Type::Bool, &operand, unary.operand.span);
                Type::Bool
            }
        }
    }

    fn check_call(&mut self, call: &CallExpr, span: Span) -> Type {
        // Only direct calls through a name are supported
        let ExprKind::Identifier(callee) = &call.callee.kind else {
            self.add_error(
                SemanticError::CalleeNotIdentifier {
                    span: call.callee.span.into(),
                },
                call.callee.span,
            );
            return Type::Unknown;
        };

        let callee = *callee;
        let name = self.interner.resolve(callee).to_string();

        // Built-in functions take priority over user declarations
        if let Some(result) = self.check_builtin_call(&name, call, span) {
            return result;
        }

        let callee_type = match self.symbols.lookup(callee) {
            Some(info) => info.ty.clone(),
            None => {
                self.add_error(
                    SemanticError::UndefinedFunction {
                        name,
                        span: span.into(),
                    },
                    span,
                );
                return Type::Unknown;
            }
        };

        match callee_type {
            Type::Function {
                params,
                return_type,
            } => {
                if call.args.len() != params.len() {
                    self.add_error(
                        SemanticError::WrongArgumentCount {
                            name,
                            expected: params.len(),
                            found: call.args.len(),
                            span: span.into(),
                        },
                        span,
                    );
                    return Type::Unknown;
                }

                for (param, arg) in params.iter().zip(call.args.iter()) {
                    let arg_type = self.check_expr(arg);
                    self.expect_equal(param, &arg_type, arg.span);
                }

                *return_type
            }
            other => {
                if !other.is_unknown() {
                    self.add_error(
                        SemanticError::NotCallable {
                            name,
                            span: span.into(),
                        },
                        span,
                    );
                }
                Type::Unknown
            }
        }
    }

    /// Check a call against the fixed builtin surface. Returns None
    /// when the name is not a builtin.
    fn check_builtin_call(&mut self, name: &str, call: &CallExpr, span: Span) -> Option<Type> {
        let arity_error = |checker: &mut Self, expected: usize| {
            checker.add_error(
                SemanticError::WrongArgumentCount {
                    name: name.to_string(),
                    expected,
                    found: call.args.len(),
                    span: span.into(),
                },
                span,
            );
        };

        match name {
            // print/println accept any single value; Int stands in for Unit
            "print" | "println" => {
                if call.args.len() != 1 {
                    arity_error(self, 1);
                    return Some(Type::Unknown);
                }
                self.check_expr(&call.args[0]);
                Some(Type::Int)
            }

            "to_string" => {
                if call.args.len() != 1 {
                    arity_error(self, 1);
                    return Some(Type::Unknown);
                }
                self.check_expr(&call.args[0]);
                Some(Type::String)
            }

            "read_file" => {
                if call.args.len() != 1 {
                    arity_error(self, 1);
                    return Some(Type::Unknown);
                }
                let arg_type = self.check_expr(&call.args[0]);
                self.expect_equal(&Type::String, &arg_type, call.args[0].span);
                Some(Type::String)
            }

            "write_file" | "append_file" => {
                if call.args.len() != 2 {
                    arity_error(self, 2);
                    return Some(Type::Unknown);
                }
                for arg in &call.args {
                    let arg_type = self.check_expr(arg);
                    self.expect_equal(&Type::String, &arg_type, arg.span);
                }
                Some(Type::Bool)
            }

            "file_exists" => {
                if call.args.len() != 1 {
                    arity_error(self, 1);
                    return Some(Type::Unknown);
                }
                let arg_type = self.check_expr(&call.args[0]);
                self.expect_equal(&Type::String, &arg_type, call.args[0].span);
                Some(Type::Bool)
            }

            _ => None,
        }
    }

    fn check_method_call(&mut self, method_call: &MethodCallExpr) -> Type {
        let receiver_type = self.check_expr(&method_call.receiver);
        let method = self.interner.resolve(method_call.method).to_string();

        if receiver_type.is_unknown() {
            // Receiver already failed; still walk the arguments
            for arg in &method_call.args {
                self.check_expr(arg);
            }
            return Type::Unknown;
        }

        let Some(sig) = lookup_method(&receiver_type, &method) else {
            self.add_error(
                SemanticError::UnknownMethod {
                    receiver: receiver_type.to_string(),
                    method,
                    span: method_call.method_span.into(),
                },
                method_call.method_span,
            );
            return Type::Unknown;
        };

        if method_call.args.len() != sig.params.len() {
            self.add_error(
                SemanticError::MethodArgumentCount {
                    method,
                    expected: sig.params.len(),
                    found: method_call.args.len(),
                    span: method_call.method_span.into(),
                },
                method_call.method_span,
            );
            return sig.return_type;
        }

        for (param, arg) in sig.params.iter().zip(method_call.args.iter()) {
            let arg_type = self.check_expr(arg);
            self.expect_equal(param, &arg_type, arg.span);
        }

        sig.return_type
    }

    fn check_index(&mut self, index: &IndexExpr, span: Span) -> Type {
        let object_type = self.check_expr(&index.object);
        let index_type = self.check_expr(&index.index);

        self.expect_equal(&Type::Int, &index_type, index.index.span);

        match object_type {
            Type::List(element) => *element,

            Type::Tuple(element_types) => {
                // Tuple elements have distinct types, so the index
                // must be known statically and in bounds.
                if let ExprKind::IntLiteral(value) = &index.index.kind {
                    let value = *value;
                    if value < 0 || value as usize >= element_types.len() {
                        self.add_error(
                            SemanticError::TupleIndexOutOfBounds {
                                index: value,
                                len: element_types.len(),
                                span: index.index.span.into(),
                            },
                            index.index.span,
                        );
                        Type::Unknown
                    } else {
                        element_types[value as usize].clone()
                    }
                } else {
                    self.add_error(
                        SemanticError::TupleIndexNotLiteral {
                            span: index.index.span.into(),
                        },
                        index.index.span,
                    );
                    Type::Unknown
                }
            }

            Type::Unknown => Type::Unknown,

            other => {
                self.add_error(
                    SemanticError::NotIndexable {
                        found: other.to_string(),
                        span: span.into(),
                    },
                    span,
                );
                Type::Unknown
            }
        }
    }

    fn check_lambda(&mut self, lambda: &LambdaExpr, span: Span) -> Type {
        self.symbols.enter_scope(ScopeKind::Lambda);

        // Lambda parameters carry no annotations and there is no
        // inference: they check as Unknown.
        for param in &lambda.params {
            if !self
                .symbols
                .declare(*param, SymbolKind::Parameter, Type::Unknown, span)
            {
                self.add_error(
                    SemanticError::Redeclaration {
                        name: self.interner.resolve(*param).to_string(),
                        span: span.into(),
                    },
                    span,
                );
            }
        }

        let body_type = self.check_expr(&lambda.body);

        self.symbols.exit_scope();

        Type::Function {
            params: vec![Type::Unknown; lambda.params.len()],
            return_type: Box::new(body_type),
        }
    }

    fn check_if(&mut self, if_expr: &IfExpr) -> Type {
        let cond_type = self.check_expr(&if_expr.condition);
        self.expect_equal(&Type::Bool, &cond_type, if_expr.condition.span);

        let then_type = self.check_expr(&if_expr.then_branch);

        let Some(else_branch) = &if_expr.else_branch else {
            return then_type;
        };

        let else_type = self.check_expr(else_branch);

        if then_type.equals(&else_type) {
            then_type
        } else if then_type.is_unknown() || else_type.is_unknown() {
            Type::Unknown
        } else {
            self.add_error(
                SemanticError::BranchTypeMismatch {
                    then_type: then_type.to_string(),
                    else_type: else_type.to_string(),
                    span: else_branch.span.into(),
                },
                else_branch.span,
            );
            Type::Unknown
        }
    }

    fn check_block(&mut self, block: &Block) -> Type {
        self.symbols.enter_scope(ScopeKind::Block);

        let block_type = match block.stmts.split_last() {
            None => Type::Unknown,
            Some((last, rest)) => {
                for stmt in rest {
                    self.check_stmt(stmt);
                }
                // A trailing expression statement gives the block its
                // value; anything else leaves the block Unit-typed.
                match last {
                    Stmt::Expr(expr_stmt) => self.check_expr(&expr_stmt.expr),
                    other => {
                        self.check_stmt(other);
                        Type::Unknown
                    }
                }
            }
        };

        self.symbols.exit_scope();
        block_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Lexer;
    use crate::frontend::Parser;

    fn check(source: &str) -> Result<(), Vec<TypeError>> {
        let tokens = Lexer::new(source).tokenize();
        let result = Parser::new(tokens).parse();
        assert!(
            result.errors.is_empty(),
            "parse errors: {:?}",
            result.errors
        );
        check_program(&result.program.unwrap(), &result.interner)
    }

    fn check_errors(source: &str) -> Vec<TypeError> {
        check(source).expect_err("expected type errors")
    }

    #[test]
    fn literal_types_are_obvious() {
        assert!(check("function f() returns Int { return 1 }").is_ok());
        assert!(check("function f() returns Float { return 1.5 }").is_ok());
        assert!(check("function f() returns String { return \"s\" }").is_ok());
        assert!(check("function f() returns Bool { return true }").is_ok());
    }

    #[test]
    fn return_type_mismatch_is_reported() {
        let errors = check_errors("function f() returns Int { return \"nope\" }");
        assert!(matches!(
            errors[0].error,
            SemanticError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn int_arithmetic_stays_int() {
        assert!(check("function f() returns Int { return 1 + 2 * 3 }").is_ok());
    }

    #[test]
    fn float_operand_promotes_result() {
        assert!(check("function f() returns Float { return 1 + 2.0 }").is_ok());
        assert!(check("function f() returns Float { return 1.0 % 2 }").is_ok());
        // And an Int result is then a mismatch
        let errors = check_errors("function f() returns Int { return 1 + 2.0 }");
        assert!(matches!(
            errors[0].error,
            SemanticError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn arithmetic_on_strings_is_an_error() {
        let errors = check_errors("function f() returns Int { return \"a\" + 1 }");
        assert!(matches!(
            errors[0].error,
            SemanticError::ArithmeticNotNumeric { .. }
        ));
    }

    #[test]
    fn comparison_yields_bool() {
        assert!(check("function f() returns Bool { return 1 < 2 }").is_ok());
        assert!(check("function f() returns Bool { return 1.5 >= 2 }").is_ok());
    }

    #[test]
    fn ordering_requires_numeric() {
        let errors = check_errors("function f() returns Bool { return \"a\" < \"b\" }");
        assert!(matches!(
            errors[0].error,
            SemanticError::OrderingNotNumeric { .. }
        ));
    }

    #[test]
    fn equality_requires_same_type() {
        assert!(check("function f() returns Bool { return 1 == 2 }").is_ok());
        let errors = check_errors("function f() returns Bool { return 1 == \"1\" }");
        assert!(matches!(
            errors[0].error,
            SemanticError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn logical_requires_bool() {
        assert!(check("function f() returns Bool { return true and not false }").is_ok());
        let errors = check_errors("function f() returns Bool { return 1 and true }");
        assert!(matches!(
            errors[0].error,
            SemanticError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn undefined_variable_is_reported_once() {
        // The use of x errors; the surrounding arithmetic must not
        // add a cascading second error.
        let errors = check_errors("function f() returns Int { return x + 1 }");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0].error,
            SemanticError::UndefinedVariable { .. }
        ));
    }

    #[test]
    fn let_binds_and_uses() {
        assert!(check("function f() returns Int { let x = 41 return x + 1 }").is_ok());
    }

    #[test]
    fn let_annotation_must_match() {
        let errors = check_errors("function f() returns Int { let x: Int = 1.5 return x }");
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0].error,
            SemanticError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn annotation_wins_for_recovery() {
        // x is bound as Int despite the bad initializer, so the return
        // is clean: exactly one error total.
        let errors = check_errors("function f() returns Int { let x: Int = \"s\" return x }");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn same_scope_redeclaration_fails() {
        let errors = check_errors("function f() returns Int { let x = 1 let x = 2 return x }");
        assert!(matches!(
            errors[0].error,
            SemanticError::Redeclaration { .. }
        ));
    }

    #[test]
    fn shadowing_in_nested_block_is_allowed() {
        assert!(
            check("function f() returns Int { let x = 1 let y = { let x = 2 x } return x + y }")
                .is_ok()
        );
    }

    #[test]
    fn duplicate_function_names_error() {
        let errors = check_errors(
            "function f() returns Int { return 1 } function f() returns Int { return 2 }",
        );
        assert!(matches!(
            errors[0].error,
            SemanticError::Redeclaration { .. }
        ));
    }

    #[test]
    fn call_checks_arity_and_types() {
        assert!(check(
            "function add(a: Int, b: Int) returns Int { return a + b }
             function main() returns Int { return add(1, 2) }"
        )
        .is_ok());

        let errors = check_errors(
            "function add(a: Int, b: Int) returns Int { return a + b }
             function main() returns Int { return add(1) }",
        );
        assert!(matches!(
            errors[0].error,
            SemanticError::WrongArgumentCount { .. }
        ));

        let errors = check_errors(
            "function add(a: Int, b: Int) returns Int { return a + b }
             function main() returns Int { return add(1, \"2\") }",
        );
        assert!(matches!(
            errors[0].error,
            SemanticError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn undefined_function_is_reported() {
        let errors = check_errors("function main() returns Int { return missing() }");
        assert!(matches!(
            errors[0].error,
            SemanticError::UndefinedFunction { .. }
        ));
    }

    #[test]
    fn calling_a_variable_is_not_callable() {
        let errors = check_errors("function main() returns Int { let x = 1 return x() }");
        assert!(matches!(errors[0].error, SemanticError::NotCallable { .. }));
    }

    #[test]
    fn builtin_signatures() {
        assert!(check(
            "function main() returns Int {
                 println(\"hi\")
                 print(42)
                 let s = to_string(1.5)
                 let content = read_file(\"a.txt\")
                 let ok = write_file(\"a.txt\", content)
                 let ok2 = append_file(\"a.txt\", s)
                 let e = file_exists(\"a.txt\")
                 return 0
             }"
        )
        .is_ok());
    }

    #[test]
    fn builtin_arg_types_are_checked() {
        let errors = check_errors("function main() returns Int { let s = read_file(1) return 0 }");
        assert!(matches!(
            errors[0].error,
            SemanticError::TypeMismatch { .. }
        ));

        let errors = check_errors("function main() returns Int { println(1, 2) return 0 }");
        assert!(matches!(
            errors[0].error,
            SemanticError::WrongArgumentCount { .. }
        ));
    }

    #[test]
    fn list_homogeneity() {
        assert!(check("function f() returns List[Int] { return [1, 2, 3] }").is_ok());

        let errors = check_errors("function f() returns List[Int] { return [1, \"a\", 2.0] }");
        // One error per offending element, element type stays Int
        assert_eq!(errors.len(), 2);
        for error in &errors {
            assert!(matches!(error.error, SemanticError::TypeMismatch { .. }));
        }
    }

    #[test]
    fn empty_list_is_list_of_unknown() {
        // The empty list annotated as List[Int] mismatches because
        // Unknown equals nothing; the annotation still wins.
        let errors = check_errors("function f() returns Int { let xs: List[Int] = [] return 0 }");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn list_index_yields_element_type() {
        assert!(check("function f() returns Int { let xs = [1, 2] return xs[0] }").is_ok());

        let errors = check_errors("function f() returns Int { let xs = [1] return xs[\"0\"] }");
        assert!(matches!(
            errors[0].error,
            SemanticError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn tuple_index_must_be_literal_and_in_bounds() {
        assert!(
            check("function f() returns String { let t = (1, \"a\") return t[1] }").is_ok()
        );

        let errors =
            check_errors("function f() returns Int { let t = (1, 2) return t[5] }");
        assert!(matches!(
            errors[0].error,
            SemanticError::TupleIndexOutOfBounds { .. }
        ));

        let errors = check_errors(
            "function f() returns Int { let t = (1, 2) let i = 0 return t[i] }",
        );
        assert!(matches!(
            errors[0].error,
            SemanticError::TupleIndexNotLiteral { .. }
        ));
    }

    #[test]
    fn indexing_non_collection_errors() {
        let errors = check_errors("function f() returns Int { return 1[0] }");
        assert!(matches!(
            errors[0].error,
            SemanticError::NotIndexable { .. }
        ));
    }

    #[test]
    fn tuple_pattern_destructuring() {
        assert!(
            check("function f() returns Int { let (x, y) = (10, 20) return x + y }").is_ok()
        );

        let errors =
            check_errors("function f() returns Int { let (x, y, z) = (1, 2) return x }");
        assert!(matches!(
            errors[0].error,
            SemanticError::PatternArityMismatch { .. }
        ));

        let errors = check_errors("function f() returns Int { let (x, y) = 3 return x }");
        assert!(matches!(
            errors[0].error,
            SemanticError::DestructureNonTuple { .. }
        ));
    }

    #[test]
    fn method_dispatch_by_receiver() {
        assert!(check(
            "function f() returns Int {
                 let xs = [1, 2, 3]
                 let n = xs.length() + xs.reverse().concat([4]).length()
                 let h = xs.head()
                 let t = xs.tail()
                 let s = \"Hello\".to_upper().trim()
                 let i = (-5).abs()
                 let fl = (1.5).floor()
                 return n + h + i + fl + t.length() + s.length()
             }"
        )
        .is_ok());
    }

    #[test]
    fn unknown_method_is_reported() {
        let errors = check_errors("function f() returns Int { return [1].pop() }");
        assert!(matches!(
            errors[0].error,
            SemanticError::UnknownMethod { .. }
        ));

        let errors = check_errors("function f() returns Int { return true.length() }");
        assert!(matches!(
            errors[0].error,
            SemanticError::UnknownMethod { .. }
        ));
    }

    #[test]
    fn method_arity_is_checked() {
        let errors = check_errors("function f() returns Int { return [1].length(2) }");
        assert!(matches!(
            errors[0].error,
            SemanticError::MethodArgumentCount { .. }
        ));
    }

    #[test]
    fn append_element_type_is_checked() {
        let errors =
            check_errors("function f() returns List[Int] { return [1].append(\"a\") }");
        assert!(matches!(
            errors[0].error,
            SemanticError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn if_condition_must_be_bool() {
        let errors = check_errors("function f() returns Int { return if 1 { 2 } else { 3 } }");
        assert!(matches!(
            errors[0].error,
            SemanticError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn if_branches_must_agree() {
        assert!(check("function f() returns Int { return if true { 1 } else { 2 } }").is_ok());

        let errors =
            check_errors("function f() returns Int { return if true { 1 } else { \"a\" } }");
        assert!(matches!(
            errors[0].error,
            SemanticError::BranchTypeMismatch { .. }
        ));
    }

    #[test]
    fn else_if_chains_check_through() {
        assert!(check(
            "function f(n: Int) returns Int {
                 return if n < 0 { -1 } else if n == 0 { 0 } else { 1 }
             }"
        )
        .is_ok());
    }

    #[test]
    fn block_value_is_last_expression() {
        assert!(check("function f() returns Int { let x = { let y = 1 y + 1 } return x }").is_ok());
    }

    #[test]
    fn lambda_checks_but_has_unknown_params() {
        // The lambda type-checks; binding and ignoring it is fine
        assert!(check("function f() returns Int { let g = lambda x: x return 0 }").is_ok());
    }

    #[test]
    fn lambda_body_errors_are_still_found() {
        let errors = check_errors("function f() returns Int { let g = lambda: missing return 0 }");
        assert!(matches!(
            errors[0].error,
            SemanticError::UndefinedVariable { .. }
        ));
    }

    #[test]
    fn errors_accumulate_across_functions() {
        let errors = check_errors(
            "function f() returns Int { return \"a\" }
             function g() returns Int { return missing }",
        );
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn recursion_checks() {
        assert!(check(
            "function fib(n: Int) returns Int {
                 return if n <= 1 { n } else { fib(n - 1) + fib(n - 2) }
             }"
        )
        .is_ok());
    }
}
