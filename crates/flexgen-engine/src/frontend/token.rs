//! Token definitions for the C++ declaration scanner.
//!
//! Only the tokens needed to find declarations, their names, their types and
//! their attributes get a dedicated variant. Every other operator collapses
//! into [`Token::Punct`]; its text is recovered from the span when needed.

use std::fmt;

/// A token in a C++ source file.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Structural keywords
    Struct,
    Class,
    Union,
    Enum,
    Namespace,
    Public,
    Private,
    Protected,
    Template,
    Typedef,
    Using,
    Operator,
    Extern,
    Friend,
    StaticAssert,
    /// `__attribute__` (GNU attribute introducer)
    Attribute,

    // Names and literals
    Identifier(String),
    /// `$name` annotation shorthand (name without the `$`)
    Macro(String),
    /// String literal, already unescaped
    StringLiteral(String),
    CharLiteral,
    Number,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Less,
    Greater,
    Semicolon,
    Comma,
    Colon,

    // Operators with a structural meaning
    ColonColon,
    Equal,
    Star,
    Amp,
    AmpAmp,
    Tilde,
    Arrow,
    Ellipsis,

    /// Any other operator character
    Punct,

    // Special
    Eof,
}

impl Token {
    /// True for tokens that render as a word (and therefore need a space
    /// between them and a neighbouring word).
    pub fn is_word(&self) -> bool {
        matches!(
            self,
            Token::Identifier(_)
                | Token::Number
                | Token::Struct
                | Token::Class
                | Token::Union
                | Token::Enum
                | Token::Namespace
                | Token::Public
                | Token::Private
                | Token::Protected
                | Token::Template
                | Token::Typedef
                | Token::Using
                | Token::Operator
                | Token::Extern
                | Token::Friend
                | Token::StaticAssert
                | Token::Attribute
        )
    }

    /// The identifier text, if this is an identifier.
    pub fn ident(&self) -> Option<&str> {
        match self {
            Token::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this token is the identifier `name`.
    pub fn is_ident(&self, name: &str) -> bool {
        self.ident() == Some(name)
    }
}

/// Source location information for a token or declaration.
///
/// `start`/`end` are byte offsets; `line`/`column` are 1-based and refer to
/// `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// Span from the start of `self` to the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end.max(self.start),
            line: self.line,
            column: self.column,
        }
    }

    pub fn merge(&self, other: &Span) -> Span {
        let (line, column) = if self.start <= other.start {
            (self.line, self.column)
        } else {
            (other.line, other.column)
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line,
            column,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Struct => write!(f, "struct"),
            Token::Class => write!(f, "class"),
            Token::Union => write!(f, "union"),
            Token::Enum => write!(f, "enum"),
            Token::Namespace => write!(f, "namespace"),
            Token::Public => write!(f, "public"),
            Token::Private => write!(f, "private"),
            Token::Protected => write!(f, "protected"),
            Token::Template => write!(f, "template"),
            Token::Typedef => write!(f, "typedef"),
            Token::Using => write!(f, "using"),
            Token::Operator => write!(f, "operator"),
            Token::Extern => write!(f, "extern"),
            Token::Friend => write!(f, "friend"),
            Token::StaticAssert => write!(f, "static_assert"),
            Token::Attribute => write!(f, "__attribute__"),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Macro(name) => write!(f, "${}", name),
            Token::StringLiteral(value) => write!(f, "{:?}", value),
            Token::CharLiteral => write!(f, "character literal"),
            Token::Number => write!(f, "number"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Less => write!(f, "<"),
            Token::Greater => write!(f, ">"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::Colon => write!(f, ":"),
            Token::ColonColon => write!(f, "::"),
            Token::Equal => write!(f, "="),
            Token::Star => write!(f, "*"),
            Token::Amp => write!(f, "&"),
            Token::AmpAmp => write!(f, "&&"),
            Token::Tilde => write!(f, "~"),
            Token::Arrow => write!(f, "->"),
            Token::Ellipsis => write!(f, "..."),
            Token::Punct => write!(f, "operator"),
            Token::Eof => write!(f, "end of file"),
        }
    }
}
