// src/frontend/parse_expr.rs
//
// Expression parsing for the Shrew parser: precedence climbing for
// binary operators, prefix operators, postfix chains (calls, method
// calls, indexing), and primary expressions.

use super::ast::*;
use super::parser::{ParseError, Parser};
use super::token::TokenType;
use crate::errors::ParserError;

impl Parser {
    /// Parse an expression with precedence climbing.
    ///
    /// `min_prec` is the lowest binary precedence this call may
    /// consume; `**` re-enters at its own precedence to stay
    /// right-associative, everything else re-enters one level higher.
    pub(super) fn expression(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut left = self.prefix()?;

        // Postfix operators bind tighter than any binary operator
        left = self.postfix(left)?;

        loop {
            let ty = self.peek().ty;
            if !ty.is_binary_operator() {
                break;
            }

            let prec = ty.precedence();
            if prec < min_prec {
                break;
            }

            let next_min_prec = if ty.is_right_associative() {
                prec
            } else {
                prec + 1
            };

            let op = match ty {
                TokenType::Plus => BinaryOp::Add,
                TokenType::Minus => BinaryOp::Sub,
                TokenType::Star => BinaryOp::Mul,
                TokenType::Slash => BinaryOp::Div,
                TokenType::Percent => BinaryOp::Mod,
                TokenType::StarStar => BinaryOp::Pow,
                TokenType::EqEq => BinaryOp::Eq,
                TokenType::BangEq => BinaryOp::Ne,
                TokenType::Lt => BinaryOp::Lt,
                TokenType::Gt => BinaryOp::Gt,
                TokenType::LtEq => BinaryOp::Le,
                TokenType::GtEq => BinaryOp::Ge,
                TokenType::KwAnd => BinaryOp::And,
                TokenType::KwOr => BinaryOp::Or,
                _ => break,
            };
            self.advance();

            let right = self.expression(next_min_prec)?;
            let span = left.span.merge(right.span);

            left = Expr {
                kind: ExprKind::Binary(Box::new(BinaryExpr { left, op, right })),
                span,
            };
        }

        Ok(left)
    }

    /// Parse a prefix expression: `not`, unary `-`, unary `+`, or a
    /// primary expression.
    fn prefix(&mut self) -> Result<Expr, ParseError> {
        let ty = self.peek().ty;
        if ty.is_unary_operator() {
            let op_span = self.peek().span;
            let op = match ty {
                TokenType::KwNot => UnaryOp::Not,
                TokenType::Minus => UnaryOp::Neg,
                TokenType::Plus => UnaryOp::Pos,
                _ => unreachable!("is_unary_operator covers exactly these"),
            };
            self.advance();

            // Operand binds everything above binary precedence,
            // including further prefix operators and postfix chains.
            let operand = self.expression(70)?;
            let span = op_span.merge(operand.span);

            return Ok(Expr {
                kind: ExprKind::Unary(Box::new(UnaryExpr { op, operand })),
                span,
            });
        }

        self.primary()
    }

    /// Parse a postfix chain: calls, method calls, and indexing bind
    /// left-to-right as tightly as possible.
    fn postfix(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        loop {
            if self.match_token(TokenType::LParen) {
                let args = self.call_arguments()?;
                let end = self.consume(TokenType::RParen, ")")?;
                let span = expr.span.merge(end.span);
                expr = Expr {
                    kind: ExprKind::Call(Box::new(CallExpr { callee: expr, args })),
                    span,
                };
            } else if self.match_token(TokenType::Dot) {
                let name_token = self.consume(TokenType::Identifier, "method name")?;
                let method = self.interner.intern(&name_token.lexeme);
                let method_span = name_token.span;

                self.consume(TokenType::LParen, "(")?;
                let args = self.call_arguments()?;
                let end = self.consume(TokenType::RParen, ")")?;

                let span = expr.span.merge(end.span);
                expr = Expr {
                    kind: ExprKind::MethodCall(Box::new(MethodCallExpr {
                        receiver: expr,
                        method,
                        args,
                        method_span,
                    })),
                    span,
                };
            } else if self.match_token(TokenType::LBracket) {
                let index = self.expression(0)?;
                let end = self.consume(TokenType::RBracket, "]")?;
                let span = expr.span.merge(end.span);
                expr = Expr {
                    kind: ExprKind::Index(Box::new(IndexExpr {
                        object: expr,
                        index,
                    })),
                    span,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse a comma-separated argument list (terminating ')' is left
    /// for the caller).
    fn call_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        if self.check(TokenType::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.expression(0)?);
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }

        Ok(args)
    }

    /// Parse a primary expression. On failure the offending token is
    /// consumed so error recovery always makes progress.
    fn primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();

        match token.ty {
            TokenType::IntLiteral => {
                self.advance();
                match token.int_value() {
                    Some(value) => Ok(Expr {
                        kind: ExprKind::IntLiteral(value),
                        span: token.span,
                    }),
                    None => Err(ParseError::new(
                        ParserError::InvalidLiteral {
                            message: "integer literal missing value".to_string(),
                            span: token.span.into(),
                        },
                        token.span,
                    )),
                }
            }

            TokenType::FloatLiteral => {
                self.advance();
                match token.float_value() {
                    Some(value) => Ok(Expr {
                        kind: ExprKind::FloatLiteral(value),
                        span: token.span,
                    }),
                    None => Err(ParseError::new(
                        ParserError::InvalidLiteral {
                            message: "float literal missing value".to_string(),
                            span: token.span.into(),
                        },
                        token.span,
                    )),
                }
            }

            TokenType::StringLiteral => {
                self.advance();
                match token.str_value() {
                    Some(value) => Ok(Expr {
                        kind: ExprKind::StringLiteral(value.to_string()),
                        span: token.span,
                    }),
                    None => Err(ParseError::new(
                        ParserError::InvalidLiteral {
                            message: "string literal missing value".to_string(),
                            span: token.span.into(),
                        },
                        token.span,
                    )),
                }
            }

            TokenType::KwTrue => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::BoolLiteral(true),
                    span: token.span,
                })
            }

            TokenType::KwFalse => {
                self.advance();
                Ok(Expr {
                    kind: ExprKind::BoolLiteral(false),
                    span: token.span,
                })
            }

            TokenType::Identifier => {
                self.advance();
                let name = self.interner.intern(&token.lexeme);
                Ok(Expr {
                    kind: ExprKind::Identifier(name),
                    span: token.span,
                })
            }

            TokenType::LParen => {
                self.advance();
                self.tuple_or_grouped()
            }

            TokenType::LBracket => {
                self.advance();
                self.list_literal()
            }

            TokenType::KwLambda => {
                self.advance();
                self.lambda_expression()
            }

            TokenType::KwIf => {
                self.advance();
                self.if_expression()
            }

            TokenType::LBrace => {
                self.advance();
                let block = self.block()?;
                let span = block.span;
                Ok(Expr {
                    kind: ExprKind::Block(block),
                    span,
                })
            }

            TokenType::Error => {
                self.advance();
                let message = token
                    .str_value()
                    .unwrap_or("invalid token")
                    .to_string();
                Err(ParseError::new(
                    ParserError::InvalidLiteral {
                        message,
                        span: token.span.into(),
                    },
                    token.span,
                ))
            }

            _ => {
                // Consume the unexpected token to avoid parse loops
                self.advance();
                Err(ParseError::new(
                    ParserError::ExpectedExpression {
                        found: token.ty.as_str().to_string(),
                        span: token.span.into(),
                    },
                    token.span,
                ))
            }
        }
    }

    /// Parse the rest of a parenthesized form; '(' already consumed.
    ///
    /// `()` is the empty tuple, `(e)` is grouping, and any comma makes
    /// it a tuple (trailing comma allowed).
    fn tuple_or_grouped(&mut self) -> Result<Expr, ParseError> {
        let start_span = self.previous().span;

        if self.check(TokenType::RParen) {
            let end = self.advance().span;
            return Ok(Expr {
                kind: ExprKind::Tuple(Vec::new()),
                span: start_span.merge(end),
            });
        }

        let first = self.expression(0)?;

        if self.match_token(TokenType::Comma) {
            let mut elements = vec![first];

            loop {
                if self.check(TokenType::RParen) {
                    break;
                }
                elements.push(self.expression(0)?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }

            let end = self.consume(TokenType::RParen, ")")?;
            return Ok(Expr {
                kind: ExprKind::Tuple(elements),
                span: start_span.merge(end.span),
            });
        }

        self.consume(TokenType::RParen, ")")?;
        Ok(first)
    }

    /// Parse a list literal; '[' already consumed. Trailing comma
    /// allowed.
    fn list_literal(&mut self) -> Result<Expr, ParseError> {
        let start_span = self.previous().span;
        let mut elements = Vec::new();

        if self.check(TokenType::RBracket) {
            let end = self.advance().span;
            return Ok(Expr {
                kind: ExprKind::List(elements),
                span: start_span.merge(end),
            });
        }

        elements.push(self.expression(0)?);

        while self.match_token(TokenType::Comma) {
            if self.check(TokenType::RBracket) {
                break;
            }
            elements.push(self.expression(0)?);
        }

        let end = self.consume(TokenType::RBracket, "]")?;
        Ok(Expr {
            kind: ExprKind::List(elements),
            span: start_span.merge(end.span),
        })
    }

    /// Parse a lambda; 'lambda' already consumed. Parameters are bare
    /// identifiers, the body is a single expression or a block.
    fn lambda_expression(&mut self) -> Result<Expr, ParseError> {
        let start_span = self.previous().span;
        let mut params = Vec::new();

        if !self.check(TokenType::Colon) {
            let name_token = self.consume(TokenType::Identifier, "parameter name")?;
            params.push(self.interner.intern(&name_token.lexeme));

            while self.match_token(TokenType::Comma) {
                let name_token = self.consume(TokenType::Identifier, "parameter name")?;
                params.push(self.interner.intern(&name_token.lexeme));
            }
        }

        self.consume(TokenType::Colon, ":")?;

        let body = if self.match_token(TokenType::LBrace) {
            let block = self.block()?;
            let span = block.span;
            Expr {
                kind: ExprKind::Block(block),
                span,
            }
        } else {
            self.expression(0)?
        };

        let span = start_span.merge(body.span);
        Ok(Expr {
            kind: ExprKind::Lambda(Box::new(LambdaExpr { params, body })),
            span,
        })
    }

    /// Parse an if expression; 'if' already consumed. `else if` chains
    /// nest in the else position.
    fn if_expression(&mut self) -> Result<Expr, ParseError> {
        let start_span = self.previous().span;

        let condition = self.expression(0)?;

        self.consume(TokenType::LBrace, "{")?;
        let then_block = self.block()?;
        let then_span = then_block.span;
        let then_branch = Expr {
            kind: ExprKind::Block(then_block),
            span: then_span,
        };

        let mut span = start_span.merge(then_span);

        let else_branch = if self.match_token(TokenType::KwElse) {
            let branch = if self.match_token(TokenType::KwIf) {
                self.if_expression()?
            } else {
                self.consume(TokenType::LBrace, "{")?;
                let block = self.block()?;
                let block_span = block.span;
                Expr {
                    kind: ExprKind::Block(block),
                    span: block_span,
                }
            };
            span = span.merge(branch.span);
            Some(branch)
        } else {
            None
        };

        Ok(Expr {
            kind: ExprKind::If(Box::new(IfExpr {
                condition,
                then_branch,
                else_branch,
            })),
            span,
        })
    }
}
