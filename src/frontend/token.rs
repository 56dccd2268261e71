// src/frontend/token.rs

/// All token types in the Shrew language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    // Literals
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    Identifier,

    // Keywords
    KwFunction,
    KwReturns,
    KwLet,
    KwIf,
    KwElse,
    KwReturn,
    KwLambda,
    KwTrue,
    KwFalse,
    KwAnd,
    KwOr,
    KwNot,

    // Type keywords
    KwInt,
    KwFloat,
    KwString,
    KwBool,
    KwList,

    // Operators
    Plus,
    Minus,
    Star,
    StarStar, // **
    Slash,
    Percent,
    EqEq,
    BangEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,

    // Delimiters
    Colon,
    Dot,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket, // [
    RBracket, // ]

    // Special
    Eof,
    Error,
}

impl TokenType {
    /// Get string representation for error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IntLiteral => "integer",
            Self::FloatLiteral => "float",
            Self::StringLiteral => "string",
            Self::Identifier => "identifier",
            Self::KwFunction => "function",
            Self::KwReturns => "returns",
            Self::KwLet => "let",
            Self::KwIf => "if",
            Self::KwElse => "else",
            Self::KwReturn => "return",
            Self::KwLambda => "lambda",
            Self::KwTrue => "true",
            Self::KwFalse => "false",
            Self::KwAnd => "and",
            Self::KwOr => "or",
            Self::KwNot => "not",
            Self::KwInt => "Int",
            Self::KwFloat => "Float",
            Self::KwString => "String",
            Self::KwBool => "Bool",
            Self::KwList => "List",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::StarStar => "**",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::EqEq => "==",
            Self::BangEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Eq => "=",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Comma => ",",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Eof => "end of file",
            Self::Error => "error",
        }
    }

    /// Get precedence for binary operators (precedence climbing)
    pub fn precedence(&self) -> u8 {
        match self {
            Self::KwOr => 10,
            Self::KwAnd => 20,
            Self::EqEq | Self::BangEq | Self::Lt | Self::Gt | Self::LtEq | Self::GtEq => 30,
            Self::Plus | Self::Minus => 40,
            Self::Star | Self::Slash | Self::Percent => 50,
            Self::StarStar => 60,
            _ => 0,
        }
    }

    /// Whether a binary operator groups to the right (only `**` does)
    pub fn is_right_associative(&self) -> bool {
        matches!(self, Self::StarStar)
    }

    pub fn is_binary_operator(&self) -> bool {
        self.precedence() > 0
    }

    pub fn is_unary_operator(&self) -> bool {
        matches!(self, Self::KwNot | Self::Minus | Self::Plus)
    }
}

/// Source location span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,    // Byte offset
    pub end: usize,      // Byte offset (exclusive)
    pub line: u32,       // Start line (1-indexed)
    pub column: u32,     // Start column (1-indexed)
    pub end_line: u32,   // End line (1-indexed)
    pub end_column: u32, // End column (1-indexed, exclusive)
}

impl Span {
    /// Create a new span with explicit end position
    pub fn new_with_end(
        start: usize,
        end: usize,
        line: u32,
        column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        Self {
            start,
            end,
            line,
            column,
            end_line,
            end_column,
        }
    }

    /// Create a new span, computing end position for single-line tokens
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        let length = end.saturating_sub(start);
        Self {
            start,
            end,
            line,
            column,
            end_line: line,
            end_column: column + length as u32,
        }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
            line: self.line,
            column: self.column,
            end_line: other.end_line,
            end_column: other.end_column,
        }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        // miette uses (offset, length)
        (span.start, span.end.saturating_sub(span.start)).into()
    }
}

impl From<&Span> for miette::SourceSpan {
    fn from(span: &Span) -> Self {
        (span.start, span.end.saturating_sub(span.start)).into()
    }
}

/// Literal payload carried by literal and error tokens
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
}

/// A token with its location in source code
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub ty: TokenType,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub span: Span,
}

impl Token {
    pub fn new(ty: TokenType, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            ty,
            lexeme: lexeme.into(),
            literal: None,
            span,
        }
    }

    pub fn with_literal(
        ty: TokenType,
        lexeme: impl Into<String>,
        literal: Literal,
        span: Span,
    ) -> Self {
        Self {
            ty,
            lexeme: lexeme.into(),
            literal: Some(literal),
            span,
        }
    }

    /// Integer payload of an IntLiteral token
    pub fn int_value(&self) -> Option<i64> {
        match self.literal {
            Some(Literal::Int(v)) => Some(v),
            _ => None,
        }
    }

    /// Float payload of a FloatLiteral token
    pub fn float_value(&self) -> Option<f64> {
        match self.literal {
            Some(Literal::Float(v)) => Some(v),
            _ => None,
        }
    }

    /// String payload of a StringLiteral or Error token
    pub fn str_value(&self) -> Option<&str> {
        match &self.literal {
            Some(Literal::Str(s)) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_with_end_position() {
        let span = Span::new(0, 5, 1, 1);
        assert_eq!(span.start, 0);
        assert_eq!(span.end, 5);
        assert_eq!(span.line, 1);
        assert_eq!(span.column, 1);
        assert_eq!(span.end_line, 1);
        assert_eq!(span.end_column, 6);
    }

    #[test]
    fn span_merge_preserves_end_position() {
        let span1 = Span::new_with_end(0, 5, 1, 1, 1, 6);
        let span2 = Span::new_with_end(10, 15, 2, 3, 2, 8);
        let merged = span1.merge(span2);

        assert_eq!(merged.start, 0);
        assert_eq!(merged.line, 1);
        assert_eq!(merged.column, 1);
        assert_eq!(merged.end, 15);
        assert_eq!(merged.end_line, 2);
        assert_eq!(merged.end_column, 8);
    }

    #[test]
    fn power_is_right_associative() {
        assert!(TokenType::StarStar.is_right_associative());
        assert!(!TokenType::Plus.is_right_associative());
    }

    #[test]
    fn precedence_ordering() {
        assert!(TokenType::KwOr.precedence() < TokenType::KwAnd.precedence());
        assert!(TokenType::KwAnd.precedence() < TokenType::EqEq.precedence());
        assert!(TokenType::EqEq.precedence() < TokenType::Plus.precedence());
        assert!(TokenType::Plus.precedence() < TokenType::Star.precedence());
        assert!(TokenType::Star.precedence() < TokenType::StarStar.precedence());
        assert_eq!(TokenType::LParen.precedence(), 0);
    }

    #[test]
    fn literal_payload_accessors() {
        let span = Span::new(0, 2, 1, 1);
        let t = Token::with_literal(TokenType::IntLiteral, "42", Literal::Int(42), span);
        assert_eq!(t.int_value(), Some(42));
        assert_eq!(t.float_value(), None);
        assert_eq!(t.str_value(), None);
    }
}
