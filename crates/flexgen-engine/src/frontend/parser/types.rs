//! Rendering of type strings from token runs.

use crate::frontend::token::{Span, Token};

/// Storage-class and function specifiers that are not part of a type.
pub const DROPPED_SPECIFIERS: &[&str] = &[
    "static",
    "inline",
    "virtual",
    "explicit",
    "constexpr",
    "consteval",
    "constinit",
    "mutable",
];

/// Whether `token` is a specifier that never appears in a rendered type.
pub fn is_dropped_specifier(token: &Token) -> bool {
    match token {
        Token::Extern | Token::Friend => true,
        Token::Identifier(name) => DROPPED_SPECIFIERS.contains(&name.as_str()),
        _ => false,
    }
}

/// Render tokens as a type string.
///
/// Word-like tokens are separated by one space, `,` is followed by one
/// space, and nothing else is spaced: `std::map<std::string, int>`,
/// `const char*`, `unsigned long long`.
pub fn render<'t>(tokens: impl IntoIterator<Item = &'t (Token, Span)>, source: &str) -> String {
    let mut out = String::new();
    let mut previous: Option<&Token> = None;

    for (token, span) in tokens {
        if let Some(prev) = previous {
            if (prev.is_word() && token.is_word()) || *prev == Token::Comma {
                out.push(' ');
            }
        }
        out.push_str(span.slice(source));
        previous = Some(token);
    }

    out
}
