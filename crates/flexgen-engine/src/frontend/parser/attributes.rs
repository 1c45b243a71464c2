//! Attribute parsing and annotation marker extraction.
//!
//! Three spellings carry markers:
//! - `__attribute__((annotate("...")))`
//! - `[[clang::annotate("...")]]` and `[[annotate("...")]]`
//! - `$shorthand(...)` (see [`crate::frontend::macros`])
//!
//! Every other attribute is consumed and ignored.

use super::{ParseError, Parser};
use crate::frontend::decl::Annotation;
use crate::frontend::macros;
use crate::frontend::token::{Span, Token};

/// Whether the current token starts an attribute.
pub fn at_attribute(parser: &Parser) -> bool {
    match parser.current() {
        Token::Attribute | Token::Macro(_) => true,
        Token::LeftBracket => parser.peek() == Some(&Token::LeftBracket),
        Token::Identifier(name) => {
            matches!(name.as_str(), "alignas" | "__declspec")
                && parser.peek() == Some(&Token::LeftParen)
        }
        _ => false,
    }
}

/// Parse consecutive attributes, appending any markers to `out`.
pub fn parse_attributes(parser: &mut Parser, out: &mut Vec<Annotation>) -> Result<(), ParseError> {
    while at_attribute(parser) {
        parse_attribute(parser, out)?;
    }
    Ok(())
}

/// Parse one attribute starting at the current token.
pub fn parse_attribute(parser: &mut Parser, out: &mut Vec<Annotation>) -> Result<(), ParseError> {
    let start = parser.current_span();
    match parser.current().clone() {
        Token::Attribute => parse_gnu_attribute(parser, start, out),
        Token::LeftBracket => parse_standard_attribute(parser, start, out),
        Token::Macro(name) => parse_shorthand(parser, &name, start, out),
        _ => {
            // alignas(...) / __declspec(...)
            parser.advance();
            parser.skip_group()
        }
    }
}

/// `__attribute__((item, item(args), ...))`
fn parse_gnu_attribute(
    parser: &mut Parser,
    start: Span,
    out: &mut Vec<Annotation>,
) -> Result<(), ParseError> {
    parser.advance();
    parser.expect(Token::LeftParen)?;
    parser.expect(Token::LeftParen)?;

    let mut markers = Vec::new();
    loop {
        match parser.current().clone() {
            Token::RightParen => break,
            Token::Comma => {
                parser.advance();
            }
            Token::Identifier(name) => {
                parser.advance();
                if parser.check(&Token::LeftParen) {
                    if name == "annotate" || name == "__annotate__" {
                        if let Some(marker) = parse_annotate_arguments(parser)? {
                            markers.push(marker);
                        }
                    } else {
                        parser.skip_group()?;
                    }
                }
            }
            Token::LeftParen | Token::LeftBracket | Token::LeftBrace => parser.skip_group()?,
            Token::Eof => {
                return Err(ParseError::unclosed_delimiter(
                    Token::Attribute,
                    Token::RightParen,
                    start,
                ))
            }
            _ => {
                parser.advance();
            }
        }
    }

    parser.expect(Token::RightParen)?;
    parser.expect(Token::RightParen)?;

    let span = start.to(&parser.previous_span());
    out.extend(markers.into_iter().map(|m| Annotation::new(m, span)));
    Ok(())
}

/// `[[ns::item(args), ...]]`
fn parse_standard_attribute(
    parser: &mut Parser,
    start: Span,
    out: &mut Vec<Annotation>,
) -> Result<(), ParseError> {
    parser.advance();
    parser.advance();

    // [[using clang: annotate("...")]]
    let mut default_namespace = None;
    if parser.check(&Token::Using) {
        parser.advance();
        default_namespace = parser.current().ident().map(str::to_string);
        parser.advance();
        parser.expect(Token::Colon)?;
    }

    let mut markers = Vec::new();
    loop {
        match parser.current().clone() {
            Token::RightBracket => break,
            Token::Comma => {
                parser.advance();
            }
            Token::Identifier(first) => {
                parser.advance();
                let mut namespace = default_namespace.clone();
                let mut name = first;
                while parser.check(&Token::ColonColon) {
                    parser.advance();
                    let Some(next) = parser.current().ident().map(str::to_string) else {
                        break;
                    };
                    parser.advance();
                    namespace = Some(std::mem::replace(&mut name, next));
                }

                if parser.check(&Token::LeftParen) {
                    let is_annotate = name == "annotate"
                        && matches!(namespace.as_deref(), None | Some("clang"));
                    if is_annotate {
                        if let Some(marker) = parse_annotate_arguments(parser)? {
                            markers.push(marker);
                        }
                    } else {
                        parser.skip_group()?;
                    }
                }
            }
            Token::LeftParen | Token::LeftBracket | Token::LeftBrace => parser.skip_group()?,
            Token::Eof => {
                return Err(ParseError::unclosed_delimiter(
                    Token::LeftBracket,
                    Token::RightBracket,
                    start,
                ))
            }
            _ => {
                parser.advance();
            }
        }
    }

    parser.expect(Token::RightBracket)?;
    parser.expect(Token::RightBracket)?;

    let span = start.to(&parser.previous_span());
    out.extend(markers.into_iter().map(|m| Annotation::new(m, span)));
    Ok(())
}

/// `annotate("a" "b", extra...)`: adjacent literals are concatenated; any
/// further arguments are ignored. `None` if the first argument is not a
/// string literal.
fn parse_annotate_arguments(parser: &mut Parser) -> Result<Option<String>, ParseError> {
    let arguments = parser.take_group()?;

    let mut marker = String::new();
    let mut found = false;
    for (token, _) in &arguments {
        match token {
            Token::StringLiteral(value) => {
                marker.push_str(value);
                found = true;
            }
            _ => break,
        }
    }

    Ok(found.then_some(marker))
}

/// `$name(...)`
fn parse_shorthand(
    parser: &mut Parser,
    name: &str,
    start: Span,
    out: &mut Vec<Annotation>,
) -> Result<(), ParseError> {
    parser.advance();
    if !parser.check(&Token::LeftParen) {
        tracing::trace!(shorthand = name, "shorthand without arguments ignored");
        return Ok(());
    }

    let arguments = parser.take_group()?;
    let span = start.to(&parser.previous_span());
    match macros::expand(name, &arguments, parser.source()) {
        Some(marker) => out.push(Annotation::new(marker, span)),
        None => tracing::debug!(shorthand = name, %span, "unknown shorthand skipped"),
    }
    Ok(())
}
