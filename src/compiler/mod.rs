// src/compiler/mod.rs
//! Two-pass bytecode compiler.
//!
//! Pass 1 reserves a function-table entry per declaration so calls can
//! resolve forward references; pass 2 emits each body and fixes up the
//! entry's offset and local count. Lowering happens on a type-checked
//! tree, so unresolved names here are compiler bugs, not user errors.

use crate::bytecode::{BuiltinId, Bytecode, Op};
use crate::errors::CompileError;
use crate::frontend::{Interner, Span, Symbol, ast::*};
use crate::runtime::Value;
use rustc_hash::FxHashMap;

struct LocalScope {
    locals: FxHashMap<Symbol, usize>,
    local_count: usize,
}

impl LocalScope {
    fn new() -> Self {
        Self {
            locals: FxHashMap::default(),
            local_count: 0,
        }
    }
}

pub struct Compiler<'a> {
    interner: &'a Interner,
    bytecode: Bytecode,
    scopes: Vec<LocalScope>,
    function_indices: FxHashMap<Symbol, usize>,
    /// Last opcode emitted, for the implicit-RETURN check
    last_op: Option<Op>,
}

/// Compile a type-checked program to bytecode.
pub fn compile_program(program: &Program, interner: &Interner) -> Result<Bytecode, CompileError> {
    Compiler::new(interner).compile(program)
}

impl<'a> Compiler<'a> {
    pub fn new(interner: &'a Interner) -> Self {
        Self {
            interner,
            bytecode: Bytecode::new(),
            scopes: Vec::new(),
            function_indices: FxHashMap::default(),
            last_op: None,
        }
    }

    pub fn compile(mut self, program: &Program) -> Result<Bytecode, CompileError> {
        // Pass 1: reserve function-table entries
        self.collect_functions(program);

        // Pass 2: emit bodies
        for func in &program.functions {
            self.compile_function(func)?;
        }

        self.emit(Op::Halt);

        Ok(self.bytecode)
    }

    // ===== Two-pass compilation =====

    fn collect_functions(&mut self, program: &Program) {
        for func in &program.functions {
            let name = self.interner.resolve(func.name).to_string();
            let param_count = func.params.len();

            // Offset and local count are provisional until pass 2
            let func_idx =
                self.bytecode
                    .add_function(name, self.bytecode.current_offset(), param_count, param_count);
            self.function_indices.insert(func.name, func_idx);
        }
    }

    fn compile_function(&mut self, func: &FuncDecl) -> Result<(), CompileError> {
        let func_idx = self.function_indices[&func.name];
        self.bytecode.functions[func_idx].offset = self.bytecode.current_offset();

        self.enter_scope();

        // Parameters occupy slots 0..param_count
        for param in &func.params {
            self.declare_local(param.name);
        }

        self.compile_block(&func.body)?;

        // Bodies that fall off the end return their trailing value
        if self.last_op != Some(Op::Return) {
            self.emit(Op::Return);
        }

        let local_count = self
            .scopes
            .last()
            .map(|scope| scope.local_count)
            .unwrap_or(0);
        self.bytecode.functions[func_idx].local_count = local_count;

        self.exit_scope();
        Ok(())
    }

    // ===== Scope management =====

    fn enter_scope(&mut self) {
        self.scopes.push(LocalScope::new());
    }

    fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    fn declare_local(&mut self, name: Symbol) -> usize {
        let scope = self.scopes.last_mut().expect("local outside of scope");
        let index = scope.local_count;
        scope.local_count += 1;
        scope.locals.insert(name, index);
        index
    }

    fn resolve_local(&self, name: Symbol) -> Option<usize> {
        // Innermost scope first
        for scope in self.scopes.iter().rev() {
            if let Some(&index) = scope.locals.get(&name) {
                return Some(index);
            }
        }
        None
    }

    fn resolve_function(&self, name: Symbol) -> Option<usize> {
        self.function_indices.get(&name).copied()
    }

    // ===== Emission helpers =====

    fn emit(&mut self, op: Op) {
        self.bytecode.emit(op);
        self.last_op = Some(op);
    }

    fn emit_u16(&mut self, op: Op, operand: u16) {
        self.bytecode.emit_u16(op, operand);
        self.last_op = Some(op);
    }

    fn emit_u16_u8(&mut self, op: Op, operand1: u16, operand2: u8) {
        self.bytecode.emit_u16_u8(op, operand1, operand2);
        self.last_op = Some(op);
    }

    fn add_constant(&mut self, value: Value, span: Span) -> Result<u16, CompileError> {
        self.bytecode
            .add_constant(value)
            .ok_or(CompileError::TooManyConstants { span: span.into() })
    }

    /// Emit a jump with a 0xFFFF placeholder; returns the byte offset
    /// of the jump opcode for later patching.
    fn emit_jump(&mut self, op: Op) -> usize {
        self.emit_u16(op, 0xFFFF);
        self.bytecode.current_offset() - 3
    }

    /// Patch a forward jump to land at the current offset. The operand
    /// is relative to the instruction after the jump.
    fn patch_jump(&mut self, jump_offset: usize, span: Span) -> Result<(), CompileError> {
        let distance = self.bytecode.current_offset() as i64 - (jump_offset as i64 + 3);
        let distance = i16::try_from(distance)
            .map_err(|_| CompileError::JumpTooFar { span: span.into() })?;
        self.bytecode.patch_jump(jump_offset, distance);
        Ok(())
    }

    // ===== Statements =====

    fn compile_stmt(&mut self, stmt: &Stmt) -> Result<(), CompileError> {
        match stmt {
            Stmt::Let(let_stmt) => {
                self.compile_expr(&let_stmt.init)?;
                self.compile_pattern(&let_stmt.pattern, &let_stmt.init.span)
            }
            Stmt::Return(ret) => {
                self.compile_expr(&ret.value)?;
                self.emit(Op::Return);
                Ok(())
            }
            Stmt::Expr(expr_stmt) => {
                self.compile_expr(&expr_stmt.expr)?;
                self.emit(Op::Pop);
                Ok(())
            }
        }
    }

    /// Lower a binding pattern against the value on top of the stack.
    ///
    /// Identifier patterns take a fresh slot and store into it. Tuple
    /// patterns index their sub-values out with DUP / CONSTANT / INDEX
    /// and recurse, then drop the original tuple.
    fn compile_pattern(&mut self, pattern: &Pattern, span: &Span) -> Result<(), CompileError> {
        match pattern {
            Pattern::Ident { name, .. } => {
                let index = self.declare_local(*name);
                self.emit_u16(Op::StoreLocal, index as u16);
                Ok(())
            }
            Pattern::Tuple { elements, .. } => {
                for (i, element) in elements.iter().enumerate() {
                    self.emit(Op::Dup);
                    let idx_const = self.add_constant(Value::Int(i as i64), *span)?;
                    self.emit_u16(Op::Constant, idx_const);
                    self.emit(Op::Index);
                    self.compile_pattern(element, span)?;
                }
                // Drop the original tuple
                self.emit(Op::Pop);
                Ok(())
            }
        }
    }

    // ===== Expressions =====

    fn compile_expr(&mut self, expr: &Expr) -> Result<(), CompileError> {
        match &expr.kind {
            ExprKind::IntLiteral(value) => {
                let idx = self.add_constant(Value::Int(*value), expr.span)?;
                self.emit_u16(Op::Constant, idx);
                Ok(())
            }

            ExprKind::FloatLiteral(value) => {
                let idx = self.add_constant(Value::Float(*value), expr.span)?;
                self.emit_u16(Op::Constant, idx);
                Ok(())
            }

            ExprKind::StringLiteral(value) => {
                let idx = self.add_constant(Value::Str(value.clone()), expr.span)?;
                self.emit_u16(Op::Constant, idx);
                Ok(())
            }

            ExprKind::BoolLiteral(value) => {
                self.emit(if *value { Op::True } else { Op::False });
                Ok(())
            }

            ExprKind::Identifier(name) => {
                if let Some(index) = self.resolve_local(*name) {
                    self.emit_u16(Op::LoadLocal, index as u16);
                    return Ok(());
                }
                if let Some(index) = self.resolve_function(*name) {
                    // Function used as a value: push its index marker
                    self.emit_u16(Op::LoadGlobal, index as u16);
                    return Ok(());
                }
                // Unresolvable after a clean type check
                Err(CompileError::UndefinedIdentifier {
                    name: self.interner.resolve(*name).to_string(),
                    span: expr.span.into(),
                })
            }

            ExprKind::Binary(binary) => {
                self.compile_expr(&binary.left)?;
                self.compile_expr(&binary.right)?;
                self.emit(match binary.op {
                    BinaryOp::Add => Op::Add,
                    BinaryOp::Sub => Op::Sub,
                    BinaryOp::Mul => Op::Mul,
                    BinaryOp::Div => Op::Div,
                    BinaryOp::Mod => Op::Mod,
                    BinaryOp::Pow => Op::Pow,
                    BinaryOp::Eq => Op::Eq,
                    BinaryOp::Ne => Op::Ne,
                    BinaryOp::Lt => Op::Lt,
                    BinaryOp::Gt => Op::Gt,
                    BinaryOp::Le => Op::Le,
                    BinaryOp::Ge => Op::Ge,
                    BinaryOp::And => Op::And,
                    BinaryOp::Or => Op::Or,
                });
                Ok(())
            }

            ExprKind::Unary(unary) => {
                self.compile_expr(&unary.operand)?;
                self.emit(match unary.op {
                    UnaryOp::Not => Op::Not,
                    UnaryOp::Neg => Op::Negate,
                    UnaryOp::Pos => Op::Positive,
                });
                Ok(())
            }

            ExprKind::Tuple(elements) => {
                for element in elements {
                    self.compile_expr(element)?;
                }
                self.emit_u16(Op::BuildTuple, elements.len() as u16);
                Ok(())
            }

            ExprKind::List(elements) => {
                for element in elements {
                    self.compile_expr(element)?;
                }
                self.emit_u16(Op::BuildList, elements.len() as u16);
                Ok(())
            }

            ExprKind::Index(index) => {
                self.compile_expr(&index.object)?;
                self.compile_expr(&index.index)?;
                self.emit(Op::Index);
                Ok(())
            }

            ExprKind::MethodCall(method_call) => {
                self.compile_expr(&method_call.receiver)?;
                for arg in &method_call.args {
                    self.compile_expr(arg)?;
                }
                let name = self.interner.resolve(method_call.method).to_string();
                let name_idx = self.add_constant(Value::Str(name), expr.span)?;
                self.emit_u16_u8(Op::CallMethod, name_idx, method_call.args.len() as u8);
                Ok(())
            }

            ExprKind::Call(call) => self.compile_call(call, expr.span),

            ExprKind::If(if_expr) => self.compile_if(if_expr, expr.span),

            ExprKind::Block(block) => self.compile_block(block),

            ExprKind::Lambda(_) => Err(CompileError::LambdaNotSupported {
                span: expr.span.into(),
            }),
        }
    }

    fn compile_call(&mut self, call: &CallExpr, span: Span) -> Result<(), CompileError> {
        let ExprKind::Identifier(callee) = &call.callee.kind else {
            // The type checker only admits direct calls
            return Err(CompileError::UndefinedIdentifier {
                name: "<indirect callee>".to_string(),
                span: call.callee.span.into(),
            });
        };
        let callee = *callee;

        let name = self.interner.resolve(callee);

        // Built-ins dispatch by fixed id
        if let Some(builtin) = BuiltinId::from_name(name) {
            for arg in &call.args {
                self.compile_expr(arg)?;
            }
            self.emit_u16_u8(Op::CallBuiltin, builtin as u16, call.args.len() as u8);
            return Ok(());
        }

        // Direct user call by function index
        let Some(func_idx) = self.resolve_function(callee) else {
            return Err(CompileError::UndefinedIdentifier {
                name: name.to_string(),
                span: span.into(),
            });
        };

        for arg in &call.args {
            self.compile_expr(arg)?;
        }
        self.emit_u16_u8(Op::Call, func_idx as u16, call.args.len() as u8);
        Ok(())
    }

    /// Lower an if expression.
    ///
    /// Conditional jumps peek rather than pop, so each branch starts
    /// with an explicit POP of the condition; both POPs are required
    /// for the two paths to stay stack-balanced.
    fn compile_if(&mut self, if_expr: &IfExpr, span: Span) -> Result<(), CompileError> {
        self.compile_expr(&if_expr.condition)?;

        let else_jump = self.emit_jump(Op::JumpIfFalse);
        self.emit(Op::Pop);

        self.compile_expr(&if_expr.then_branch)?;
        let end_jump = self.emit_jump(Op::Jump);

        self.patch_jump(else_jump, span)?;
        self.emit(Op::Pop);

        match &if_expr.else_branch {
            Some(else_branch) => self.compile_expr(else_branch)?,
            // An if without else still produces a value
            None => self.emit(Op::False),
        }

        self.patch_jump(end_jump, span)
    }

    /// Lower a block expression. The last statement, when it is an
    /// expression statement, keeps its value on the stack as the
    /// block's value; an empty block pushes a placeholder.
    fn compile_block(&mut self, block: &Block) -> Result<(), CompileError> {
        let Some((last, rest)) = block.stmts.split_last() else {
            self.emit(Op::False);
            return Ok(());
        };

        for stmt in rest {
            self.compile_stmt(stmt)?;
        }

        match last {
            Stmt::Expr(expr_stmt) => self.compile_expr(&expr_stmt.expr),
            other => self.compile_stmt(other),
        }
    }
}
