// src/frontend/parse_stmt.rs
//
// Statement and block parsing for the Shrew parser.

use super::ast::*;
use super::parser::{ParseError, Parser};
use super::token::TokenType;

impl Parser {
    /// Parse a single statement.
    pub(super) fn statement(&mut self) -> Result<Stmt, ParseError> {
        if self.match_token(TokenType::KwLet) {
            return self.let_statement();
        }

        if self.match_token(TokenType::KwReturn) {
            return self.return_statement();
        }

        self.expression_statement()
    }

    /// Parse a let statement; 'let' is already consumed.
    fn let_statement(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.previous().span;

        let pattern = self.parse_pattern()?;

        let ty = if self.match_token(TokenType::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        self.consume(TokenType::Eq, "=")?;

        let init = self.expression(0)?;
        let span = start_span.merge(init.span);

        Ok(Stmt::Let(LetStmt {
            pattern,
            ty,
            init,
            span,
        }))
    }

    /// Parse a return statement; 'return' is already consumed.
    fn return_statement(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.previous().span;

        let value = self.expression(0)?;
        let span = start_span.merge(value.span);

        Ok(Stmt::Return(ReturnStmt { value, span }))
    }

    fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.expression(0)?;
        let span = expr.span;
        Ok(Stmt::Expr(ExprStmt { expr, span }))
    }

    /// Parse a block; '{' is already consumed. Statement errors are
    /// recorded and parsing resumes at the next statement boundary so
    /// one bad statement does not hide the rest of the block.
    pub(super) fn block(&mut self) -> Result<Block, ParseError> {
        let start_span = self.previous().span;
        let mut stmts = Vec::new();

        while !self.check(TokenType::RBrace) && !self.is_at_end() {
            match self.statement() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize();
                    // A boundary inside this block keeps the loop going;
                    // a closing brace ends it naturally.
                }
            }
        }

        let end = self.consume(TokenType::RBrace, "}")?;

        Ok(Block {
            stmts,
            span: start_span.merge(end.span),
        })
    }
}
