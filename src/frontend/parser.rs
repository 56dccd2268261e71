// src/frontend/parser.rs

use crate::errors::{LexerError, ParserError};
use crate::frontend::{Interner, Lexer, Span, Token, TokenType, ast::*};

/// A parse error wrapping a miette-enabled ParserError
#[derive(Debug, Clone)]
pub struct ParseError {
    pub error: ParserError,
    pub span: Span,
}

impl ParseError {
    pub fn new(error: ParserError, span: Span) -> Self {
        Self { error, span }
    }
}

/// Result of parsing a token stream. `program` holds everything that
/// could be recovered; a parse only counts as successful when `errors`
/// is empty.
#[derive(Debug)]
pub struct ParseResult {
    pub program: Option<Program>,
    pub errors: Vec<ParseError>,
    pub interner: Interner,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.program.is_some()
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    pub(super) interner: Interner,
    pub(super) errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(
            tokens.last().map(|t| t.ty) == Some(TokenType::Eof),
            "token stream must end with Eof"
        );
        Self {
            tokens,
            current: 0,
            interner: Interner::new(),
            errors: Vec::new(),
        }
    }

    /// Parse a whole program, recovering past errors at statement
    /// boundaries so every diagnostic in the file is reported.
    pub fn parse(mut self) -> ParseResult {
        let mut functions = Vec::new();

        while !self.is_at_end() {
            if self.match_token(TokenType::KwFunction) {
                match self.function_decl() {
                    Ok(func) => functions.push(func),
                    Err(err) => {
                        self.errors.push(err);
                        self.synchronize();
                    }
                }
            } else {
                let span = self.peek().span;
                self.errors.push(ParseError::new(
                    ParserError::ExpectedFunction { span: span.into() },
                    span,
                ));
                self.advance(); // skip the stray token to keep making progress
            }
        }

        ParseResult {
            program: Some(Program { functions }),
            errors: self.errors,
            interner: self.interner,
        }
    }

    // ===== Token stream management =====

    pub(super) fn peek(&self) -> &Token {
        if self.current >= self.tokens.len() {
            self.tokens.last().expect("token stream is never empty")
        } else {
            &self.tokens[self.current]
        }
    }

    pub(super) fn previous(&self) -> &Token {
        if self.current == 0 {
            &self.tokens[0]
        } else {
            &self.tokens[self.current - 1]
        }
    }

    pub(super) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub(super) fn check(&self, ty: TokenType) -> bool {
        self.peek().ty == ty
    }

    pub(super) fn match_token(&mut self, ty: TokenType) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.peek().ty == TokenType::Eof
    }

    /// Consume a token of the given type or produce an ExpectedToken
    /// error naming what was wanted.
    pub(super) fn consume(&mut self, ty: TokenType, expected: &str) -> Result<Token, ParseError> {
        if self.check(ty) {
            Ok(self.advance().clone())
        } else {
            let found = self.peek();
            Err(ParseError::new(
                ParserError::ExpectedToken {
                    expected: expected.to_string(),
                    found: found.ty.as_str().to_string(),
                    span: found.span.into(),
                },
                found.span,
            ))
        }
    }

    /// Skip tokens until a likely statement boundary.
    pub(super) fn synchronize(&mut self) {
        while !self.is_at_end() {
            if matches!(
                self.peek().ty,
                TokenType::KwFunction
                    | TokenType::KwLet
                    | TokenType::KwReturn
                    | TokenType::KwIf
                    | TokenType::LBrace
                    | TokenType::RBrace
            ) {
                return;
            }
            self.advance();
        }
    }

    // ===== Declarations =====

    /// Parse a function declaration; 'function' is already consumed.
    fn function_decl(&mut self) -> Result<FuncDecl, ParseError> {
        let start_span = self.previous().span;

        let name_token = self.consume(TokenType::Identifier, "function name")?;
        let name = self.interner.intern(&name_token.lexeme);

        self.consume(TokenType::LParen, "(")?;

        let mut params = Vec::new();
        if !self.check(TokenType::RParen) {
            loop {
                params.push(self.parameter()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }

        self.consume(TokenType::RParen, ")")?;
        self.consume(TokenType::KwReturns, "returns")?;

        let return_type = self.parse_type()?;

        self.consume(TokenType::LBrace, "{")?;
        let body = self.block()?;
        let span = start_span.merge(body.span);

        Ok(FuncDecl {
            name,
            params,
            return_type,
            body,
            span,
        })
    }

    fn parameter(&mut self) -> Result<Param, ParseError> {
        let name_token = self.consume(TokenType::Identifier, "parameter name")?;
        let name = self.interner.intern(&name_token.lexeme);
        let start_span = name_token.span;

        self.consume(TokenType::Colon, ":")?;
        let ty = self.parse_type()?;
        let span = start_span.merge(ty.span());

        Ok(Param { name, ty, span })
    }

    // ===== Types =====

    pub(super) fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        let token = self.peek().clone();

        match token.ty {
            // Built-in type keywords
            TokenType::KwInt | TokenType::KwFloat | TokenType::KwString | TokenType::KwBool => {
                self.advance();
                let name = self.interner.intern(&token.lexeme);
                Ok(TypeExpr::Named {
                    name,
                    span: token.span,
                })
            }

            // List[T]
            TokenType::KwList => {
                self.advance();
                self.consume(TokenType::LBracket, "[")?;
                let element = self.parse_type()?;
                let end = self.consume(TokenType::RBracket, "]")?;
                Ok(TypeExpr::List {
                    element: Box::new(element),
                    span: token.span.merge(end.span),
                })
            }

            // Named type; `Ident[T]` currently collapses to List[T]
            TokenType::Identifier => {
                self.advance();
                if self.match_token(TokenType::LBracket) {
                    let element = self.parse_type()?;
                    let end = self.consume(TokenType::RBracket, "]")?;
                    return Ok(TypeExpr::List {
                        element: Box::new(element),
                        span: token.span.merge(end.span),
                    });
                }
                let name = self.interner.intern(&token.lexeme);
                Ok(TypeExpr::Named {
                    name,
                    span: token.span,
                })
            }

            // Tuple type: (T1, T2, ...) or ()
            TokenType::LParen => {
                self.advance();
                let mut elements = Vec::new();

                if self.match_token(TokenType::RParen) {
                    return Ok(TypeExpr::Tuple {
                        elements,
                        span: token.span.merge(self.previous().span),
                    });
                }

                loop {
                    elements.push(self.parse_type()?);
                    if !self.match_token(TokenType::Comma) {
                        break;
                    }
                }

                let end = self.consume(TokenType::RParen, ")")?;
                Ok(TypeExpr::Tuple {
                    elements,
                    span: token.span.merge(end.span),
                })
            }

            _ => Err(ParseError::new(
                ParserError::ExpectedType {
                    span: token.span.into(),
                },
                token.span,
            )),
        }
    }

    // ===== Patterns =====

    pub(super) fn parse_pattern(&mut self) -> Result<Pattern, ParseError> {
        let token = self.peek().clone();

        // Identifier pattern
        if token.ty == TokenType::Identifier {
            self.advance();
            let name = self.interner.intern(&token.lexeme);
            return Ok(Pattern::Ident {
                name,
                span: token.span,
            });
        }

        // Tuple destructuring pattern: (p1, p2, ...)
        if self.match_token(TokenType::LParen) {
            let mut elements = Vec::new();

            if self.match_token(TokenType::RParen) {
                return Ok(Pattern::Tuple {
                    elements,
                    span: token.span.merge(self.previous().span),
                });
            }

            loop {
                elements.push(self.parse_pattern()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }

            let end = self.consume(TokenType::RParen, ")")?;
            return Ok(Pattern::Tuple {
                elements,
                span: token.span.merge(end.span),
            });
        }

        Err(ParseError::new(
            ParserError::ExpectedPattern {
                span: token.span.into(),
            },
            token.span,
        ))
    }
}

/// Lex and parse a source string in one call.
pub fn parse_source(source: &str) -> (ParseResult, Vec<LexerError>) {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize();
    let lex_errors = lexer.take_errors();
    let result = Parser::new(tokens).parse();
    (result, lex_errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Lexer;

    fn parse(source: &str) -> ParseResult {
        let tokens = Lexer::new(source).tokenize();
        Parser::new(tokens).parse()
    }

    fn parse_ok(source: &str) -> (Program, Interner) {
        let result = parse(source);
        assert!(
            result.errors.is_empty(),
            "unexpected parse errors: {:?}",
            result.errors
        );
        (result.program.unwrap(), result.interner)
    }

    #[test]
    fn parse_empty_program() {
        let (program, _) = parse_ok("");
        assert!(program.functions.is_empty());
    }

    #[test]
    fn parse_minimal_function() {
        let (program, interner) = parse_ok("function main() returns Int { return 0 }");
        assert_eq!(program.functions.len(), 1);

        let func = &program.functions[0];
        assert_eq!(interner.resolve(func.name), "main");
        assert!(func.params.is_empty());
        assert!(matches!(func.return_type, TypeExpr::Named { .. }));
        assert_eq!(func.body.stmts.len(), 1);
        assert!(matches!(func.body.stmts[0], Stmt::Return(_)));
    }

    #[test]
    fn parse_function_with_params() {
        let (program, interner) =
            parse_ok("function add(a: Int, b: Float) returns Float { return b }");
        let func = &program.functions[0];
        assert_eq!(func.params.len(), 2);
        assert_eq!(interner.resolve(func.params[0].name), "a");
        assert_eq!(interner.resolve(func.params[1].name), "b");
    }

    #[test]
    fn parse_list_type() {
        let (program, _) = parse_ok("function f(xs: List[Int]) returns List[Int] { return xs }");
        let func = &program.functions[0];
        assert!(matches!(func.params[0].ty, TypeExpr::List { .. }));
        assert!(matches!(func.return_type, TypeExpr::List { .. }));
    }

    #[test]
    fn parse_nested_list_type() {
        let (program, _) = parse_ok("function f() returns List[List[Int]] { return [] }");
        match &program.functions[0].return_type {
            TypeExpr::List { element, .. } => assert!(matches!(**element, TypeExpr::List { .. })),
            other => panic!("expected list type, got {:?}", other),
        }
    }

    #[test]
    fn parse_tuple_type() {
        let (program, _) = parse_ok("function f() returns (Int, String) { return (1, \"a\") }");
        match &program.functions[0].return_type {
            TypeExpr::Tuple { elements, .. } => assert_eq!(elements.len(), 2),
            other => panic!("expected tuple type, got {:?}", other),
        }
    }

    #[test]
    fn parse_empty_tuple_type() {
        let (program, _) = parse_ok("function f() returns () { return () }");
        match &program.functions[0].return_type {
            TypeExpr::Tuple { elements, .. } => assert!(elements.is_empty()),
            other => panic!("expected tuple type, got {:?}", other),
        }
    }

    #[test]
    fn generic_ident_type_collapses_to_list() {
        // `Vec[Int]` is accepted and currently means List[Int]
        let (program, _) = parse_ok("function f(xs: Vec[Int]) returns Int { return 0 }");
        assert!(matches!(
            program.functions[0].params[0].ty,
            TypeExpr::List { .. }
        ));
    }

    #[test]
    fn parse_tuple_pattern() {
        let (program, _) = parse_ok("function f() returns Int { let (x, y) = (1, 2) return x }");
        let func = &program.functions[0];
        match &func.body.stmts[0] {
            Stmt::Let(let_stmt) => match &let_stmt.pattern {
                Pattern::Tuple { elements, .. } => assert_eq!(elements.len(), 2),
                other => panic!("expected tuple pattern, got {:?}", other),
            },
            other => panic!("expected let, got {:?}", other),
        }
    }

    #[test]
    fn parse_nested_tuple_pattern() {
        let (program, _) =
            parse_ok("function f() returns Int { let (a, (b, c)) = (1, (2, 3)) return b }");
        match &program.functions[0].body.stmts[0] {
            Stmt::Let(let_stmt) => match &let_stmt.pattern {
                Pattern::Tuple { elements, .. } => {
                    assert!(matches!(elements[0], Pattern::Ident { .. }));
                    assert!(matches!(elements[1], Pattern::Tuple { .. }));
                }
                other => panic!("expected tuple pattern, got {:?}", other),
            },
            other => panic!("expected let, got {:?}", other),
        }
    }

    #[test]
    fn top_level_junk_is_reported() {
        let result = parse("42 function main() returns Int { return 0 }");
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.errors[0].error,
            ParserError::ExpectedFunction { .. }
        ));
        // The function after the junk is still recovered
        assert_eq!(result.program.unwrap().functions.len(), 1);
    }

    #[test]
    fn missing_paren_recovers_to_next_function() {
        let result = parse(
            "function broken( returns Int { return 0 }\nfunction ok() returns Int { return 1 }",
        );
        assert!(!result.errors.is_empty());
        let program = result.program.unwrap();
        // At least the second function survives recovery
        assert!(!program.functions.is_empty());
    }

    #[test]
    fn error_in_block_reports_all_statements() {
        let result = parse("function f() returns Int { let = 1 let x = 2 return x }");
        assert!(!result.errors.is_empty());
        let program = result.program.unwrap();
        assert_eq!(program.functions.len(), 1);
        // Recovery kept parsing: later statements are present
        assert!(program.functions[0].body.stmts.len() >= 2);
    }

    #[test]
    fn parse_source_collects_lexer_errors() {
        let (result, lex_errors) = parse_source("function f() returns Int { return @ }");
        assert_eq!(lex_errors.len(), 1);
        // The parser also stumbles over the error token
        assert!(!result.errors.is_empty());
    }
}
