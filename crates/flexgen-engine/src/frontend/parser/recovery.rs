//! Error recovery and loop guards for the declaration scanner.
//!
//! After a malformed declaration the scanner skips to the next point where a
//! declaration can start, so one bad line does not hide the errors after it.

use super::{ParseError, Parser};
use crate::frontend::token::{Span, Token};

/// Maximum nesting of namespaces and records before the scanner gives up.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Detects a loop that stopped consuming tokens.
pub struct LoopGuard {
    name: &'static str,
    last_pos: Option<usize>,
}

impl LoopGuard {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            last_pos: None,
        }
    }

    /// Fails if the parser is at the same position as on the previous check.
    pub fn check(&mut self, pos: usize, span: Span) -> Result<(), ParseError> {
        if self.last_pos == Some(pos) {
            return Err(ParseError::parser_stuck(
                format!("loop '{}' made no progress", self.name),
                span,
            ));
        }
        self.last_pos = Some(pos);
        Ok(())
    }
}

/// Skip to the end of the current declaration.
///
/// Consumes a `;` at nesting depth zero. Stops before a `}` that would close
/// the enclosing body. Nested `()`/`[]`/`{}` groups are skipped whole.
pub fn sync_to_declaration_boundary(parser: &mut Parser) {
    let mut depth = 0usize;
    while !parser.at_eof() {
        match parser.current() {
            Token::LeftParen | Token::LeftBracket | Token::LeftBrace => depth += 1,
            Token::RightParen | Token::RightBracket => depth = depth.saturating_sub(1),
            Token::RightBrace => {
                if depth == 0 {
                    return;
                }
                depth -= 1;
            }
            Token::Semicolon if depth == 0 => {
                parser.advance();
                return;
            }
            _ => {}
        }
        parser.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_consumes_semicolon() {
        let mut parser = Parser::new("int f(a; b); int y;").unwrap();
        sync_to_declaration_boundary(&mut parser);
        assert!(parser.current().is_ident("int"));
    }

    #[test]
    fn test_sync_stops_before_closing_brace() {
        let mut parser = Parser::new("garbage ( ) }").unwrap();
        sync_to_declaration_boundary(&mut parser);
        assert_eq!(parser.current(), &Token::RightBrace);
    }

    #[test]
    fn test_loop_guard_detects_stall() {
        let mut guard = LoopGuard::new("test");
        assert!(guard.check(3, Span::default()).is_ok());
        assert!(guard.check(4, Span::default()).is_ok());
        assert!(guard.check(4, Span::default()).is_err());
    }
}
