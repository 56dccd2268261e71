// src/frontend/lexer.rs

use crate::errors::LexerError;
use crate::frontend::{Literal, Span, Token, TokenType};

pub struct Lexer<'src> {
    source: &'src str,
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    start: usize,
    current: usize,
    line: u32,
    column: u32,
    start_column: u32,
    start_line: u32,
    // Error collection
    errors: Vec<LexerError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_column: 1,
            start_line: 1,
            errors: Vec::new(),
        }
    }

    /// Take all collected errors, leaving the internal list empty.
    pub fn take_errors(&mut self) -> Vec<LexerError> {
        std::mem::take(&mut self.errors)
    }

    /// Check if any errors have been collected.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the source string being lexed.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Drive the lexer to completion, appending an Eof sentinel.
    ///
    /// Error tokens are kept in the stream; scanning continues past
    /// them so all lexical errors in a file are collected in one pass.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let at_end = token.ty == TokenType::Eof;
            tokens.push(token);
            if at_end {
                break;
            }
        }
        tokens
    }

    /// Get the next token from the source
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        self.start = self.current;
        self.start_column = self.column;
        self.start_line = self.line;

        let Some(c) = self.advance() else {
            return self.make_token(TokenType::Eof);
        };

        match c {
            '(' => self.make_token(TokenType::LParen),
            ')' => self.make_token(TokenType::RParen),
            '{' => self.make_token(TokenType::LBrace),
            '}' => self.make_token(TokenType::RBrace),
            '[' => self.make_token(TokenType::LBracket),
            ']' => self.make_token(TokenType::RBracket),
            ',' => self.make_token(TokenType::Comma),
            '.' => self.make_token(TokenType::Dot),
            ':' => self.make_token(TokenType::Colon),
            '+' => self.make_token(TokenType::Plus),
            '-' => self.make_token(TokenType::Minus),
            '/' => self.make_token(TokenType::Slash),
            '%' => self.make_token(TokenType::Percent),

            '*' => {
                if self.match_char('*') {
                    self.make_token(TokenType::StarStar)
                } else {
                    self.make_token(TokenType::Star)
                }
            }
            '=' => {
                if self.match_char('=') {
                    self.make_token(TokenType::EqEq)
                } else {
                    self.make_token(TokenType::Eq)
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.make_token(TokenType::BangEq)
                } else {
                    self.error_unexpected_char('!')
                }
            }
            '<' => {
                if self.match_char('=') {
                    self.make_token(TokenType::LtEq)
                } else {
                    self.make_token(TokenType::Lt)
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.make_token(TokenType::GtEq)
                } else {
                    self.make_token(TokenType::Gt)
                }
            }

            // Comment: '#' to end of line, '#[' ... ']#' multi-line
            '#' => {
                if self.match_char('[') {
                    self.skip_multiline_comment();
                } else {
                    self.skip_line_comment();
                }
                self.next_token()
            }

            // String literal
            '"' => self.string(),

            // Number literal
            c if c.is_ascii_digit() => self.number(),

            // Identifier or keyword
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),

            _ => self.error_unexpected_char(c),
        }
    }

    /// Skip whitespace: spaces, tabs, carriage returns, and newlines
    fn skip_whitespace(&mut self) {
        while let Some(' ') | Some('\t') | Some('\r') | Some('\n') = self.peek() {
            self.advance();
        }
    }

    fn skip_line_comment(&mut self) {
        while self.peek().is_some() && self.peek() != Some('\n') {
            self.advance();
        }
    }

    /// Skip a `#[ ... ]#` comment. Does not nest; an unterminated
    /// comment silently runs to end of input.
    fn skip_multiline_comment(&mut self) {
        loop {
            match self.peek() {
                None => return,
                Some(']') if self.peek_next() == Some('#') => {
                    self.advance(); // ']'
                    self.advance(); // '#'
                    return;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Advance to the next character and return it, tracking line/column
    fn advance(&mut self) -> Option<char> {
        if let Some((idx, c)) = self.chars.next() {
            self.current = idx + c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(c)
        } else {
            None
        }
    }

    /// Peek at the next character without consuming it
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    /// Peek at the character after the next one
    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current..].chars();
        iter.next(); // skip current
        iter.next()
    }

    /// Consume the next character if it matches the expected character
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn current_span(&self) -> Span {
        Span::new_with_end(
            self.start,
            self.current,
            self.start_line,
            self.start_column,
            self.line,
            self.column,
        )
    }

    /// Create a token from start to current position
    fn make_token(&self, ty: TokenType) -> Token {
        let lexeme = &self.source[self.start..self.current];
        Token::new(ty, lexeme, self.current_span())
    }

    /// Create a token carrying a literal payload
    fn make_literal_token(&self, ty: TokenType, literal: Literal) -> Token {
        let lexeme = &self.source[self.start..self.current];
        Token::with_literal(ty, lexeme, literal, self.current_span())
    }

    /// Create an error token, collecting the matching error
    fn error_token(&mut self, error: LexerError, message: String) -> Token {
        let span = self.current_span();
        self.errors.push(error);
        let lexeme = &self.source[self.start..self.current];
        Token::with_literal(TokenType::Error, lexeme, Literal::Str(message), span)
    }

    fn error_unexpected_char(&mut self, c: char) -> Token {
        let span = self.current_span();
        self.error_token(
            LexerError::UnexpectedCharacter {
                ch: c,
                span: span.into(),
            },
            format!("unexpected character '{}'", c),
        )
    }

    fn error_unterminated_string(&mut self) -> Token {
        let span = self.current_span();
        self.error_token(
            LexerError::UnterminatedString { span: span.into() },
            "unterminated string literal".to_string(),
        )
    }

    /// Scan an identifier or keyword
    fn identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[self.start..self.current];
        let ty = Self::keyword_type(text).unwrap_or(TokenType::Identifier);
        self.make_token(ty)
    }

    /// Check if a string is a keyword and return its token type
    fn keyword_type(text: &str) -> Option<TokenType> {
        match text {
            "function" => Some(TokenType::KwFunction),
            "returns" => Some(TokenType::KwReturns),
            "let" => Some(TokenType::KwLet),
            "if" => Some(TokenType::KwIf),
            "else" => Some(TokenType::KwElse),
            "return" => Some(TokenType::KwReturn),
            "lambda" => Some(TokenType::KwLambda),
            "true" => Some(TokenType::KwTrue),
            "false" => Some(TokenType::KwFalse),
            "and" => Some(TokenType::KwAnd),
            "or" => Some(TokenType::KwOr),
            "not" => Some(TokenType::KwNot),
            "Int" => Some(TokenType::KwInt),
            "Float" => Some(TokenType::KwFloat),
            "String" => Some(TokenType::KwString),
            "Bool" => Some(TokenType::KwBool),
            "List" => Some(TokenType::KwList),
            _ => None,
        }
    }

    /// Scan a number literal (integer or float), allowing internal
    /// underscores. A decimal point followed by a digit or an exponent
    /// promotes the literal to a float.
    fn number(&mut self) -> Token {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
            self.advance();
        }

        let mut is_float = false;

        // Fractional part
        if self.peek() == Some('.') {
            if let Some(next) = self.peek_next() {
                if next.is_ascii_digit() {
                    is_float = true;
                    self.advance(); // consume '.'
                    while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
                        self.advance();
                    }
                }
            }
        }

        // Exponent
        if matches!(self.peek(), Some('e') | Some('E')) {
            is_float = true;
            self.advance(); // consume 'e' or 'E'

            if matches!(self.peek(), Some('+') | Some('-')) {
                self.advance();
            }

            if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                let span = self.current_span();
                return self.error_token(
                    LexerError::InvalidExponent { span: span.into() },
                    "invalid exponent in number literal".to_string(),
                );
            }

            while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
                self.advance();
            }
        }

        // Strip underscores before parsing
        let lexeme = &self.source[self.start..self.current];
        let cleaned: String = lexeme.chars().filter(|&c| c != '_').collect();

        if is_float {
            match cleaned.parse::<f64>() {
                Ok(value) => self.make_literal_token(TokenType::FloatLiteral, Literal::Float(value)),
                Err(_) => {
                    let span = self.current_span();
                    self.error_token(
                        LexerError::InvalidFloat { span: span.into() },
                        "invalid float literal".to_string(),
                    )
                }
            }
        } else {
            match cleaned.parse::<i64>() {
                Ok(value) => self.make_literal_token(TokenType::IntLiteral, Literal::Int(value)),
                Err(_) => {
                    let span = self.current_span();
                    self.error_token(
                        LexerError::InvalidInt { span: span.into() },
                        "invalid integer literal".to_string(),
                    )
                }
            }
        }
    }

    /// Scan a string literal, processing escape sequences.
    ///
    /// Recognized escapes: \n \t \r \\ \". An unknown escape is kept
    /// literally as a backslash followed by the character. Embedded
    /// newlines are allowed and keep line tracking accurate.
    fn string(&mut self) -> Token {
        let mut value = String::new();

        loop {
            match self.peek() {
                None => return self.error_unterminated_string(),
                Some('"') => {
                    self.advance();
                    return self.make_literal_token(TokenType::StringLiteral, Literal::Str(value));
                }
                Some('\\') => {
                    self.advance(); // consume '\'
                    let Some(c) = self.advance() else {
                        return self.error_unterminated_string();
                    };
                    match c {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '\\' => value.push('\\'),
                        '"' => value.push('"'),
                        other => {
                            // Unknown escape is preserved literally
                            value.push('\\');
                            value.push(other);
                        }
                    }
                }
                Some(_) => {
                    // advance() keeps line/column in sync for newlines
                    if let Some(c) = self.advance() {
                        value.push(c);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LexerError;

    fn token_types(source: &str) -> Vec<TokenType> {
        Lexer::new(source).tokenize().iter().map(|t| t.ty).collect()
    }

    #[test]
    fn lex_single_char_tokens() {
        let mut lexer = Lexer::new("( ) { } [ ] , : .");
        assert_eq!(lexer.next_token().ty, TokenType::LParen);
        assert_eq!(lexer.next_token().ty, TokenType::RParen);
        assert_eq!(lexer.next_token().ty, TokenType::LBrace);
        assert_eq!(lexer.next_token().ty, TokenType::RBrace);
        assert_eq!(lexer.next_token().ty, TokenType::LBracket);
        assert_eq!(lexer.next_token().ty, TokenType::RBracket);
        assert_eq!(lexer.next_token().ty, TokenType::Comma);
        assert_eq!(lexer.next_token().ty, TokenType::Colon);
        assert_eq!(lexer.next_token().ty, TokenType::Dot);
        assert_eq!(lexer.next_token().ty, TokenType::Eof);
    }

    #[test]
    fn lex_operators() {
        let mut lexer = Lexer::new("+ - * ** / % == != < > <= >= =");
        assert_eq!(lexer.next_token().ty, TokenType::Plus);
        assert_eq!(lexer.next_token().ty, TokenType::Minus);
        assert_eq!(lexer.next_token().ty, TokenType::Star);
        assert_eq!(lexer.next_token().ty, TokenType::StarStar);
        assert_eq!(lexer.next_token().ty, TokenType::Slash);
        assert_eq!(lexer.next_token().ty, TokenType::Percent);
        assert_eq!(lexer.next_token().ty, TokenType::EqEq);
        assert_eq!(lexer.next_token().ty, TokenType::BangEq);
        assert_eq!(lexer.next_token().ty, TokenType::Lt);
        assert_eq!(lexer.next_token().ty, TokenType::Gt);
        assert_eq!(lexer.next_token().ty, TokenType::LtEq);
        assert_eq!(lexer.next_token().ty, TokenType::GtEq);
        assert_eq!(lexer.next_token().ty, TokenType::Eq);
    }

    #[test]
    fn lex_keywords() {
        let mut lexer = Lexer::new("function returns let if else return lambda");
        assert_eq!(lexer.next_token().ty, TokenType::KwFunction);
        assert_eq!(lexer.next_token().ty, TokenType::KwReturns);
        assert_eq!(lexer.next_token().ty, TokenType::KwLet);
        assert_eq!(lexer.next_token().ty, TokenType::KwIf);
        assert_eq!(lexer.next_token().ty, TokenType::KwElse);
        assert_eq!(lexer.next_token().ty, TokenType::KwReturn);
        assert_eq!(lexer.next_token().ty, TokenType::KwLambda);
    }

    #[test]
    fn lex_type_keywords() {
        assert_eq!(
            token_types("Int Float String Bool List"),
            vec![
                TokenType::KwInt,
                TokenType::KwFloat,
                TokenType::KwString,
                TokenType::KwBool,
                TokenType::KwList,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn lex_word_operators() {
        assert_eq!(
            token_types("and or not true false"),
            vec![
                TokenType::KwAnd,
                TokenType::KwOr,
                TokenType::KwNot,
                TokenType::KwTrue,
                TokenType::KwFalse,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn lex_numbers() {
        let mut lexer = Lexer::new("42 3.14 0 1000");
        let t1 = lexer.next_token();
        assert_eq!(t1.ty, TokenType::IntLiteral);
        assert_eq!(t1.int_value(), Some(42));

        let t2 = lexer.next_token();
        assert_eq!(t2.ty, TokenType::FloatLiteral);
        assert_eq!(t2.float_value(), Some(3.14));

        assert_eq!(lexer.next_token().int_value(), Some(0));
        assert_eq!(lexer.next_token().int_value(), Some(1000));
    }

    #[test]
    fn lex_number_underscores() {
        let mut lexer = Lexer::new("1_000_000 1_2.5_0");
        let t1 = lexer.next_token();
        assert_eq!(t1.ty, TokenType::IntLiteral);
        assert_eq!(t1.int_value(), Some(1_000_000));
        assert_eq!(t1.lexeme, "1_000_000");

        let t2 = lexer.next_token();
        assert_eq!(t2.ty, TokenType::FloatLiteral);
        assert_eq!(t2.float_value(), Some(12.50));
    }

    #[test]
    fn lex_number_exponents() {
        let mut lexer = Lexer::new("1e3 2.5E-2 7e+1");
        let t1 = lexer.next_token();
        assert_eq!(t1.ty, TokenType::FloatLiteral);
        assert_eq!(t1.float_value(), Some(1000.0));

        let t2 = lexer.next_token();
        assert_eq!(t2.ty, TokenType::FloatLiteral);
        assert_eq!(t2.float_value(), Some(0.025));

        let t3 = lexer.next_token();
        assert_eq!(t3.ty, TokenType::FloatLiteral);
        assert_eq!(t3.float_value(), Some(70.0));
    }

    #[test]
    fn lex_invalid_exponent() {
        let mut lexer = Lexer::new("1e");
        let t = lexer.next_token();
        assert_eq!(t.ty, TokenType::Error);
        assert!(matches!(
            lexer.take_errors().as_slice(),
            [LexerError::InvalidExponent { .. }]
        ));
    }

    #[test]
    fn lex_int_overflow_is_error() {
        // One past i64::MAX
        let mut lexer = Lexer::new("9223372036854775808");
        let t = lexer.next_token();
        assert_eq!(t.ty, TokenType::Error);
        assert!(matches!(
            lexer.take_errors().as_slice(),
            [LexerError::InvalidInt { .. }]
        ));
    }

    #[test]
    fn lex_dot_without_digit_is_not_float() {
        // `1.foo()` must lex as Int, Dot, Identifier
        assert_eq!(
            token_types("1.foo"),
            vec![
                TokenType::IntLiteral,
                TokenType::Dot,
                TokenType::Identifier,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn lex_string() {
        let mut lexer = Lexer::new("\"hello world\"");
        let t = lexer.next_token();
        assert_eq!(t.ty, TokenType::StringLiteral);
        assert_eq!(t.str_value(), Some("hello world"));
        assert_eq!(t.lexeme, "\"hello world\"");
    }

    #[test]
    fn lex_string_escapes() {
        let mut lexer = Lexer::new(r#""a\nb\tc\\d\"e\rf""#);
        let t = lexer.next_token();
        assert_eq!(t.ty, TokenType::StringLiteral);
        assert_eq!(t.str_value(), Some("a\nb\tc\\d\"e\rf"));
    }

    #[test]
    fn lex_string_unknown_escape_kept_literally() {
        let mut lexer = Lexer::new(r#""a\xb""#);
        let t = lexer.next_token();
        assert_eq!(t.ty, TokenType::StringLiteral);
        assert_eq!(t.str_value(), Some("a\\xb"));
    }

    #[test]
    fn lex_string_embedded_newline() {
        let mut lexer = Lexer::new("\"a\nb\" x");
        let t = lexer.next_token();
        assert_eq!(t.ty, TokenType::StringLiteral);
        assert_eq!(t.str_value(), Some("a\nb"));

        // The identifier after the string is on line 2
        let x = lexer.next_token();
        assert_eq!(x.ty, TokenType::Identifier);
        assert_eq!(x.span.line, 2);
    }

    #[test]
    fn lex_unterminated_string() {
        let mut lexer = Lexer::new("\"hello");
        let t = lexer.next_token();
        assert_eq!(t.ty, TokenType::Error);
        assert_eq!(t.str_value(), Some("unterminated string literal"));
        assert!(matches!(
            lexer.take_errors().as_slice(),
            [LexerError::UnterminatedString { .. }]
        ));
    }

    #[test]
    fn lex_line_comment() {
        assert_eq!(
            token_types("42 # this is a comment\n43"),
            vec![TokenType::IntLiteral, TokenType::IntLiteral, TokenType::Eof]
        );
    }

    #[test]
    fn lex_multiline_comment() {
        assert_eq!(
            token_types("1 #[ comment\nspanning lines ]# 2"),
            vec![TokenType::IntLiteral, TokenType::IntLiteral, TokenType::Eof]
        );
    }

    #[test]
    fn lex_multiline_comment_does_not_nest() {
        // The comment ends at the first ]#, leaving the rest as code
        assert_eq!(
            token_types("#[ a #[ b ]# x"),
            vec![TokenType::Identifier, TokenType::Eof]
        );
    }

    #[test]
    fn lex_bang_alone_is_error() {
        let mut lexer = Lexer::new("!");
        let t = lexer.next_token();
        assert_eq!(t.ty, TokenType::Error);
        assert_eq!(t.str_value(), Some("unexpected character '!'"));
    }

    #[test]
    fn lex_bang_eq_is_fine() {
        assert_eq!(
            token_types("a != b"),
            vec![
                TokenType::Identifier,
                TokenType::BangEq,
                TokenType::Identifier,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn lexer_continues_after_errors() {
        let mut lexer = Lexer::new("let @ x = 42");

        assert_eq!(lexer.next_token().ty, TokenType::KwLet);
        assert_eq!(lexer.next_token().ty, TokenType::Error); // @
        assert_eq!(lexer.next_token().ty, TokenType::Identifier); // x
        assert_eq!(lexer.next_token().ty, TokenType::Eq);
        assert_eq!(lexer.next_token().ty, TokenType::IntLiteral); // 42
        assert_eq!(lexer.next_token().ty, TokenType::Eof);

        let errors = lexer.take_errors();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            LexerError::UnexpectedCharacter { ch: '@', .. }
        ));
    }

    #[test]
    fn lexer_take_errors_clears_errors() {
        let mut lexer = Lexer::new("@");
        lexer.next_token();

        assert!(lexer.has_errors());
        assert_eq!(lexer.take_errors().len(), 1);
        assert!(!lexer.has_errors());
        assert!(lexer.take_errors().is_empty());
    }

    #[test]
    fn lexer_tracks_line_and_column() {
        let mut lexer = Lexer::new("a\n  b");
        let a = lexer.next_token();
        assert_eq!(a.span.line, 1);
        assert_eq!(a.span.column, 1);

        let b = lexer.next_token();
        assert_eq!(b.span.line, 2);
        assert_eq!(b.span.column, 3);
        assert_eq!(b.span.start, 4);
    }

    #[test]
    fn tokenize_appends_eof() {
        let tokens = Lexer::new("").tokenize();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].ty, TokenType::Eof);
    }

    #[test]
    fn tokenize_keeps_error_tokens_in_stream() {
        let tokens = Lexer::new("@ $ 1").tokenize();
        let types: Vec<_> = tokens.iter().map(|t| t.ty).collect();
        assert_eq!(
            types,
            vec![
                TokenType::Error,
                TokenType::Error,
                TokenType::IntLiteral,
                TokenType::Eof,
            ]
        );
    }
}
