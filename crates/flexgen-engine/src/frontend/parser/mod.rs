//! Declaration scanner for C++ sources.
//!
//! This is a recursive descent scanner over the token stream from the
//! lexer. It does not build expressions or statements: it finds
//! declarations, their names, their types, their extents and the
//! annotation markers attached to them, and records them in a
//! [`DeclTree`]. Function bodies and initializers are skipped as balanced
//! token groups.

pub mod attributes;
pub mod declarations;
pub mod error;
pub mod recovery;
pub mod types;

use crate::frontend::decl::DeclTree;
use crate::frontend::lexer::{LexError, Lexer};
use crate::frontend::token::{Span, Token};

pub use error::{ParseError, ParseErrorKind};

/// What kind of body the scanner is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    File,
    Namespace,
    Record,
}

/// Scanner state.
pub struct Parser<'a> {
    /// Source text, for slicing token text
    source: &'a str,

    /// Pre-tokenized input, always terminated by `Token::Eof`
    tokens: Vec<(Token, Span)>,

    /// Current position in token stream
    pos: usize,

    /// Accumulated parse errors (allows continuing after errors)
    errors: Vec<ParseError>,

    /// Tree under construction
    tree: DeclTree,

    /// Current namespace/record nesting
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser from source code.
    pub fn new(source: &'a str) -> Result<Self, Vec<LexError>> {
        let tokens = Lexer::new(source).tokenize()?;

        Ok(Self {
            source,
            tokens,
            pos: 0,
            errors: Vec::new(),
            tree: DeclTree::new(source.len()),
            depth: 0,
        })
    }

    /// Scan the whole file.
    ///
    /// Returns the tree on success, or all accumulated errors on failure.
    pub fn parse(mut self) -> Result<DeclTree, Vec<ParseError>> {
        let root = self.tree.root();
        declarations::parse_declarations(&mut self, root, Scope::File);

        if !self.errors.is_empty() {
            return Err(self.errors);
        }

        Ok(self.tree)
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Get the current token.
    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    /// Get the current token's span.
    #[inline]
    pub fn current_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        if self.pos == 0 {
            return self.current_span();
        }
        self.tokens[self.pos - 1].1
    }

    /// Peek at the next token (lookahead).
    #[inline]
    pub fn peek(&self) -> Option<&Token> {
        self.peek_at(1)
    }

    /// Peek `n` tokens ahead.
    pub fn peek_at(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|(tok, _)| tok)
    }

    /// Advance to the next token, returning the previous current token.
    pub fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    /// Current position in the token stream.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move back to an earlier position.
    pub(crate) fn rewind(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len() - 1);
    }

    /// Tokens in `[from, to)`.
    pub fn tokens_between(&self, from: usize, to: usize) -> &[(Token, Span)] {
        &self.tokens[from..to]
    }

    /// Check if the current token matches the given kind.
    #[inline]
    pub fn check(&self, expected: &Token) -> bool {
        std::mem::discriminant(self.current()) == std::mem::discriminant(expected)
    }

    /// Check if we've reached EOF.
    #[inline]
    pub fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    /// Consume the current token if it matches the expected kind.
    pub fn expect(&mut self, expected: Token) -> Result<Token, ParseError> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected_token(&[expected]))
        }
    }

    /// Consume the `}` closing a body opened at `open`.
    pub fn expect_closing_brace(&mut self, open: Span) -> Result<Span, ParseError> {
        if self.check(&Token::RightBrace) {
            self.advance();
            Ok(self.previous_span())
        } else if self.at_eof() {
            Err(ParseError::unclosed_delimiter(
                Token::LeftBrace,
                Token::RightBrace,
                open,
            ))
        } else {
            Err(self.unexpected_token(&[Token::RightBrace]))
        }
    }

    // ========================================================================
    // Balanced groups
    // ========================================================================

    /// Skip a `(...)`, `[...]` or `{...}` group starting at the current token.
    pub fn skip_group(&mut self) -> Result<(), ParseError> {
        let open_span = self.current_span();
        let mut stack = match self.current() {
            Token::LeftParen => vec![Token::RightParen],
            Token::LeftBracket => vec![Token::RightBracket],
            Token::LeftBrace => vec![Token::RightBrace],
            _ => {
                return Err(self.unexpected_token(&[
                    Token::LeftParen,
                    Token::LeftBracket,
                    Token::LeftBrace,
                ]))
            }
        };
        let open = self.advance();

        while let Some(close) = stack.last().cloned() {
            if self.at_eof() {
                let expected_close = stack.first().cloned().unwrap_or(Token::RightParen);
                return Err(ParseError::unclosed_delimiter(open, expected_close, open_span));
            }
            if self.check(&close) {
                stack.pop();
            } else {
                match self.current() {
                    Token::LeftParen => stack.push(Token::RightParen),
                    Token::LeftBracket => stack.push(Token::RightBracket),
                    Token::LeftBrace => stack.push(Token::RightBrace),
                    Token::RightParen | Token::RightBracket | Token::RightBrace => {
                        return Err(self.unexpected_token(&[close]));
                    }
                    _ => {}
                }
            }
            self.advance();
        }

        Ok(())
    }

    /// Return the tokens strictly inside the group starting at the current
    /// token, consuming the whole group.
    pub fn take_group(&mut self) -> Result<Vec<(Token, Span)>, ParseError> {
        let inner_start = self.pos + 1;
        self.skip_group()?;
        let inner_end = self.pos.saturating_sub(1).max(inner_start);
        Ok(self.tokens[inner_start..inner_end].to_vec())
    }

    /// Skip a template argument or parameter list starting at `<`.
    ///
    /// Angle brackets inside nested `()`/`[]`/`{}` groups are not counted,
    /// so `std::enable_if_t<(N > 0)>` is one group.
    pub fn skip_angle_group(&mut self) -> Result<(), ParseError> {
        let open_span = self.current_span();
        self.expect(Token::Less)?;
        let mut depth = 1usize;

        while depth > 0 {
            match self.current() {
                Token::Less => {
                    depth += 1;
                    self.advance();
                }
                Token::Greater => {
                    depth -= 1;
                    self.advance();
                }
                Token::LeftParen | Token::LeftBracket | Token::LeftBrace => self.skip_group()?,
                Token::Eof | Token::Semicolon | Token::RightBrace | Token::RightParen => {
                    return Err(ParseError::unclosed_delimiter(
                        Token::Less,
                        Token::Greater,
                        open_span,
                    ));
                }
                _ => {
                    self.advance();
                }
            }
        }

        Ok(())
    }

    /// Skip tokens until one of `stops` is current at nesting depth zero.
    ///
    /// Fails at end of file or at an unbalanced closer.
    pub fn skip_until(&mut self, stops: &[Token]) -> Result<(), ParseError> {
        loop {
            if stops.iter().any(|t| self.check(t)) {
                return Ok(());
            }
            match self.current() {
                Token::LeftParen | Token::LeftBracket | Token::LeftBrace => self.skip_group()?,
                Token::Eof | Token::RightParen | Token::RightBracket | Token::RightBrace => {
                    return Err(self.unexpected_token(stops));
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip through the `;` ending the current declaration; returns its span.
    pub fn skip_to_semicolon(&mut self) -> Result<Span, ParseError> {
        self.skip_until(&[Token::Semicolon])?;
        self.advance();
        Ok(self.previous_span())
    }

    // ========================================================================
    // Tree and nesting
    // ========================================================================

    pub(crate) fn tree_mut(&mut self) -> &mut DeclTree {
        &mut self.tree
    }

    /// Enter a namespace or record body.
    pub(crate) fn enter(&mut self, span: Span) -> Result<(), ParseError> {
        if self.depth >= recovery::MAX_NESTING_DEPTH {
            return Err(ParseError::parser_limit_exceeded(
                format!("nesting deeper than {} levels", recovery::MAX_NESTING_DEPTH),
                span,
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Record a parse error and keep scanning.
    pub fn push_error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Create an "unexpected token" error at the current position.
    pub fn unexpected_token(&self, expected: &[Token]) -> ParseError {
        let span = self.current_span();
        if self.at_eof() {
            ParseError::unexpected_eof(expected.to_vec(), span)
        } else {
            ParseError::unexpected_token(expected.to_vec(), self.current().clone(), span)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_new() {
        let parser = Parser::new("struct S {};").unwrap();
        assert!(matches!(parser.current(), Token::Struct));
    }

    #[test]
    fn test_parser_advance() {
        let mut parser = Parser::new("int x").unwrap();
        let tok = parser.advance();
        assert!(tok.is_ident("int"));
        assert!(parser.current().is_ident("x"));
        parser.advance();
        assert!(parser.at_eof());
        // Advancing at EOF stays at EOF
        parser.advance();
        assert!(parser.at_eof());
    }

    #[test]
    fn test_skip_group_nested() {
        let mut parser = Parser::new("( a [ b ] { c ( ) } ) tail").unwrap();
        parser.skip_group().unwrap();
        assert!(parser.current().is_ident("tail"));
    }

    #[test]
    fn test_skip_group_unclosed() {
        let mut parser = Parser::new("{ a ( b ) ").unwrap();
        let err = parser.skip_group().unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UnclosedDelimiter { .. }));
    }

    #[test]
    fn test_skip_group_mismatched() {
        let mut parser = Parser::new("( a ] )").unwrap();
        assert!(parser.skip_group().is_err());
    }

    #[test]
    fn test_take_group() {
        let mut parser = Parser::new("(a, b) c").unwrap();
        let inner = parser.take_group().unwrap();
        assert_eq!(inner.len(), 3);
        assert!(parser.current().is_ident("c"));
    }

    #[test]
    fn test_skip_angle_group_ignores_parenthesized_greater() {
        let mut parser = Parser::new("<typename T, typename = std::enable_if_t<(N > 0)>> x").unwrap();
        parser.skip_angle_group().unwrap();
        assert!(parser.current().is_ident("x"));
    }

    #[test]
    fn test_skip_angle_group_unclosed() {
        let mut parser = Parser::new("<int x;").unwrap();
        assert!(parser.skip_angle_group().is_err());
    }

    #[test]
    fn test_parse_reports_all_errors() {
        let errors = Parser::new("int f( ; struct S { int x; ").unwrap().parse().unwrap_err();
        assert!(!errors.is_empty());
    }
}
