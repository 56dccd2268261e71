// src/frontend/ast.rs

use crate::frontend::Span;

/// Unique identifier for interned names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(pub u32);

/// A complete program: a sequence of function declarations
#[derive(Debug, Clone)]
pub struct Program {
    pub functions: Vec<FuncDecl>,
}

/// Function declaration: `function name(params) returns Type { ... }`
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub return_type: TypeExpr,
    pub body: Block,
    pub span: Span,
}

/// Function parameter with a required type annotation
#[derive(Debug, Clone)]
pub struct Param {
    pub name: Symbol,
    pub ty: TypeExpr,
    pub span: Span,
}

/// Type annotation
#[derive(Debug, Clone)]
pub enum TypeExpr {
    /// Named type: Int, Float, String, Bool, or an identifier
    Named { name: Symbol, span: Span },
    /// List type: List[T]
    List { element: Box<TypeExpr>, span: Span },
    /// Tuple type: (T1, T2, ...); () is the empty tuple type
    Tuple { elements: Vec<TypeExpr>, span: Span },
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Named { span, .. }
            | TypeExpr::List { span, .. }
            | TypeExpr::Tuple { span, .. } => *span,
        }
    }
}

/// Block of statements; as an expression its value is the value of a
/// trailing expression statement
#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// Statements
#[derive(Debug, Clone)]
pub enum Stmt {
    Let(LetStmt),
    Return(ReturnStmt),
    Expr(ExprStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Let(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Expr(s) => s.span,
        }
    }
}

/// Let binding: `let pattern [: Type] = expr`
#[derive(Debug, Clone)]
pub struct LetStmt {
    pub pattern: Pattern,
    pub ty: Option<TypeExpr>,
    pub init: Expr,
    pub span: Span,
}

/// Return statement
#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Expr,
    pub span: Span,
}

/// Expression statement
#[derive(Debug, Clone)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// Binding pattern on the left side of `let`
#[derive(Debug, Clone)]
pub enum Pattern {
    Ident { name: Symbol, span: Span },
    Tuple { elements: Vec<Pattern>, span: Span },
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Ident { span, .. } | Pattern::Tuple { span, .. } => *span,
        }
    }
}

/// Expressions
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    // Literals
    IntLiteral(i64),
    FloatLiteral(f64),
    BoolLiteral(bool),
    StringLiteral(String),

    // Variables
    Identifier(Symbol),

    /// Tuple literal: (a, b); () is the empty tuple
    Tuple(Vec<Expr>),

    /// List literal: [a, b, c]
    List(Vec<Expr>),

    // Operations
    Binary(Box<BinaryExpr>),
    Unary(Box<UnaryExpr>),

    /// Function call: f(args)
    Call(Box<CallExpr>),

    /// Method call: receiver.method(args)
    MethodCall(Box<MethodCallExpr>),

    /// Index expression: object[index]
    Index(Box<IndexExpr>),

    /// Lambda: `lambda a, b: body` (type-checked, never compiled)
    Lambda(Box<LambdaExpr>),

    /// If expression; both branches are expressions
    If(Box<IfExpr>),

    /// Block expression
    Block(Block),
}

/// Binary expression
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Expr,
    pub op: BinaryOp,
    pub right: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Mod
                | BinaryOp::Pow
        )
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Eq | BinaryOp::Ne)
    }

    pub fn is_ordering(&self) -> bool {
        matches!(self, BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge)
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// Unary expression
#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
}

/// Function call
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Expr,
    pub args: Vec<Expr>,
}

/// Method call on a receiver
#[derive(Debug, Clone)]
pub struct MethodCallExpr {
    pub receiver: Expr,
    pub method: Symbol,
    pub args: Vec<Expr>,
    pub method_span: Span,
}

/// Index expression
#[derive(Debug, Clone)]
pub struct IndexExpr {
    pub object: Expr,
    pub index: Expr,
}

/// Lambda with untyped parameters
#[derive(Debug, Clone)]
pub struct LambdaExpr {
    pub params: Vec<Symbol>,
    pub body: Expr,
}

/// If expression: `if cond { ... } [else ...]`
#[derive(Debug, Clone)]
pub struct IfExpr {
    pub condition: Expr,
    pub then_branch: Expr,
    pub else_branch: Option<Expr>,
}
