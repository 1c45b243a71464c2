//! Parse error types and error reporting

use crate::frontend::token::{Span, Token};
use std::fmt;

/// A parse error with location and contextual information.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,

    /// Source location of the error
    pub span: Span,

    /// Human-readable error message
    pub message: String,

    /// Optional suggestion for fixing the error
    pub suggestion: Option<String>,
}

/// The kind of parse error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token found
    UnexpectedToken { expected: Vec<Token>, found: Token },

    /// Unexpected end of file
    UnexpectedEof { expected: Vec<Token> },

    /// A `(`, `[`, `{` or `<` that is never closed
    UnclosedDelimiter { open: Token, expected_close: Token },

    /// Invalid syntax
    InvalidSyntax { reason: String },

    /// Nesting deeper than the scanner accepts
    ParserLimitExceeded { message: String },

    /// Parser got stuck (position didn't advance)
    ParserStuck { message: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at {}:{}: {}",
            self.span.line, self.span.column, self.message
        )?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    /// Create an "unexpected token" error.
    pub fn unexpected_token(expected: Vec<Token>, found: Token, span: Span) -> Self {
        let message = if expected.len() == 1 {
            format!("Expected '{}', found '{}'", expected[0], found)
        } else {
            let list: Vec<String> = expected.iter().map(|t| format!("'{}'", t)).collect();
            format!("Expected one of {}, found '{}'", list.join(", "), found)
        };

        Self {
            kind: ParseErrorKind::UnexpectedToken { expected, found },
            span,
            message,
            suggestion: None,
        }
    }

    /// Create an "unexpected EOF" error.
    pub fn unexpected_eof(expected: Vec<Token>, span: Span) -> Self {
        let message = if expected.len() == 1 {
            format!("Unexpected end of file, expected '{}'", expected[0])
        } else {
            let list: Vec<String> = expected.iter().map(|t| format!("'{}'", t)).collect();
            format!("Unexpected end of file, expected one of {}", list.join(", "))
        };

        Self {
            kind: ParseErrorKind::UnexpectedEof { expected },
            span,
            message,
            suggestion: None,
        }
    }

    /// Create an "unclosed delimiter" error; `span` points at the opener.
    pub fn unclosed_delimiter(open: Token, expected_close: Token, span: Span) -> Self {
        let message = format!("Unclosed '{}'", open);
        let suggestion = format!("Add a matching '{}'", expected_close);
        Self {
            kind: ParseErrorKind::UnclosedDelimiter {
                open,
                expected_close,
            },
            span,
            message,
            suggestion: Some(suggestion),
        }
    }

    /// Create an "invalid syntax" error.
    pub fn invalid_syntax(reason: impl Into<String>, span: Span) -> Self {
        let reason = reason.into();
        Self {
            kind: ParseErrorKind::InvalidSyntax {
                reason: reason.clone(),
            },
            span,
            message: format!("Invalid syntax: {}", reason),
            suggestion: None,
        }
    }

    /// Add a suggestion to this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Create a "parser limit exceeded" error.
    pub fn parser_limit_exceeded(message: impl Into<String>, span: Span) -> Self {
        let message = message.into();
        Self {
            kind: ParseErrorKind::ParserLimitExceeded {
                message: message.clone(),
            },
            span,
            message: format!("Parser limit exceeded: {}", message),
            suggestion: None,
        }
    }

    /// Create a "parser stuck" error.
    pub fn parser_stuck(message: impl Into<String>, span: Span) -> Self {
        let message = message.into();
        Self {
            kind: ParseErrorKind::ParserStuck {
                message: message.clone(),
            },
            span,
            message: format!("Parser stuck: {}", message),
            suggestion: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_token_message() {
        let err = ParseError::unexpected_token(
            vec![Token::Semicolon],
            Token::RightParen,
            Span::new(4, 5, 1, 5),
        );
        assert_eq!(err.message, "Expected ';', found ')'");
        assert_eq!(err.to_string(), "Parse error at 1:5: Expected ';', found ')'");
    }

    #[test]
    fn test_unclosed_delimiter_has_suggestion() {
        let err = ParseError::unclosed_delimiter(
            Token::LeftBrace,
            Token::RightBrace,
            Span::new(0, 1, 1, 1),
        );
        assert_eq!(err.suggestion.as_deref(), Some("Add a matching '}'"));
        assert!(err.to_string().contains("Suggestion"));
    }
}
