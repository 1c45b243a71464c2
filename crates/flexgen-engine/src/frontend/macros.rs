//! `$`-prefixed annotation shorthands.
//!
//! Sources may write `$apply(make_reflect)` instead of spelling out
//! `__attribute__((annotate("{gen};{funccall};make_reflect")))`. The scanner
//! sees the shorthand as a [`Token::Macro`] followed by a parenthesized
//! argument group and asks this module for the marker it stands for.

use crate::frontend::token::{Span, Token};

/// How a shorthand turns its argument into a marker payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArgumentStyle {
    /// The argument tokens are stringized
    Stringize,
    /// The argument is a sequence of string literals that are concatenated;
    /// anything else falls back to stringizing
    Concatenate,
    /// `(RETVAL, code...)`: the code runs inside a lambda that returns
    /// `RETVAL` as the replacement
    ReturnValue,
}

/// Shorthand name, command it expands to, and argument treatment.
const SHORTHANDS: &[(&str, &str, ArgumentStyle)] = &[
    ("apply", "funccall", ArgumentStyle::Stringize),
    ("executeCodeAndReplace", "executeCodeAndReplace", ArgumentStyle::Stringize),
    ("executeCodeAndReplaceTo", "executeCodeAndReplace", ArgumentStyle::ReturnValue),
    ("executeCodeLine", "executeStringWithoutSpaces", ArgumentStyle::Stringize),
    ("executeStringWithoutSpaces", "executeStringWithoutSpaces", ArgumentStyle::Concatenate),
    ("executeCodeAndEmptyReplace", "executeCode", ArgumentStyle::Stringize),
];

/// Expand shorthand `name` applied to `args` into a marker string.
///
/// `args` are the tokens strictly between the shorthand's parentheses.
/// Returns `None` for an unknown shorthand.
pub fn expand(name: &str, args: &[(Token, Span)], source: &str) -> Option<String> {
    let (_, command, style) = SHORTHANDS.iter().find(|(n, _, _)| *n == name)?;

    let payload = match style {
        ArgumentStyle::Concatenate => {
            concatenate_literals(args).unwrap_or_else(|| stringize(args, source))
        }
        ArgumentStyle::Stringize => stringize(args, source),
        ArgumentStyle::ReturnValue => {
            let (value, code) = match top_level_comma(args) {
                Some(comma) => (&args[..comma], &args[comma + 1..]),
                None => (args, &[][..]),
            };
            format!(
                "[&]() {{{}return new std::optional<std::string>{{{}}};}}();",
                stringize(code, source),
                stringize(value, source)
            )
        }
    };

    Some(format!("{{gen}};{{{}}};{}", command, payload))
}

/// Render tokens as the preprocessor's `#` operator would: token text kept
/// verbatim, any run of whitespace or comments between two tokens collapsed
/// to one space, nothing leading or trailing.
pub fn stringize(tokens: &[(Token, Span)], source: &str) -> String {
    let mut out = String::new();
    let mut previous_end: Option<usize> = None;

    for (_, span) in tokens {
        if let Some(end) = previous_end {
            if span.start > end {
                out.push(' ');
            }
        }
        out.push_str(span.slice(source));
        previous_end = Some(span.end);
    }

    out
}

/// Index of the first comma outside parentheses, which is where the
/// preprocessor splits macro arguments.
fn top_level_comma(tokens: &[(Token, Span)]) -> Option<usize> {
    let mut depth = 0usize;
    for (i, (token, _)) in tokens.iter().enumerate() {
        match token {
            Token::LeftParen => depth += 1,
            Token::RightParen => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

fn concatenate_literals(tokens: &[(Token, Span)]) -> Option<String> {
    if tokens.is_empty() {
        return None;
    }
    let mut out = String::new();
    for (token, _) in tokens {
        match token {
            Token::StringLiteral(value) => out.push_str(value),
            _ => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::Lexer;

    /// Lex `source` and return the tokens between the first `(` and its
    /// matching `)`.
    fn args_of(source: &str) -> Vec<(Token, Span)> {
        let tokens = Lexer::new(source).tokenize().expect("should lex");
        let open = tokens
            .iter()
            .position(|(t, _)| *t == Token::LeftParen)
            .expect("has parens");
        let mut depth = 0;
        let mut close = open;
        for (i, (t, _)) in tokens.iter().enumerate().skip(open) {
            match t {
                Token::LeftParen => depth += 1,
                Token::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        close = i;
                        break;
                    }
                }
                _ => {}
            }
        }
        tokens[open + 1..close].to_vec()
    }

    #[test]
    fn test_apply_trims_whitespace() {
        let source = "$apply(\n    make_reflect\n  )";
        let marker = expand("apply", &args_of(source), source);
        assert_eq!(marker.as_deref(), Some("{gen};{funccall};make_reflect"));
    }

    #[test]
    fn test_code_line_keeps_literal_text() {
        let source = "$executeCodeLine(LOG(INFO)   <<  \"Hello  world!\";)";
        let marker = expand("executeCodeLine", &args_of(source), source);
        assert_eq!(
            marker.as_deref(),
            Some("{gen};{executeStringWithoutSpaces};LOG(INFO) << \"Hello  world!\";")
        );
    }

    #[test]
    fn test_adjacent_tokens_not_separated() {
        let source = "$executeCodeAndReplace(new std::optional<std::string>{\"56\"};)";
        let marker = expand("executeCodeAndReplace", &args_of(source), source);
        assert_eq!(
            marker.as_deref(),
            Some("{gen};{executeCodeAndReplace};new std::optional<std::string>{\"56\"};")
        );
    }

    #[test]
    fn test_empty_replace_selects_execute_code() {
        let source = "$executeCodeAndEmptyReplace( puts(\"x\"); )";
        let marker = expand("executeCodeAndEmptyReplace", &args_of(source), source);
        assert_eq!(marker.as_deref(), Some("{gen};{executeCode};puts(\"x\");"));
    }

    #[test]
    fn test_string_without_spaces_concatenates_literals() {
        let source = "$executeStringWithoutSpaces(\"#include <cstdio>\\n\" \"puts(\\\"hi\\\");\")";
        let marker = expand("executeStringWithoutSpaces", &args_of(source), source);
        assert_eq!(
            marker.as_deref(),
            Some("{gen};{executeStringWithoutSpaces};#include <cstdio>\nputs(\"hi\");")
        );
    }

    #[test]
    fn test_string_without_spaces_falls_back_to_raw_text() {
        let source = "$executeStringWithoutSpaces(run();)";
        let marker = expand("executeStringWithoutSpaces", &args_of(source), source);
        assert_eq!(marker.as_deref(), Some("{gen};{executeStringWithoutSpaces};run();"));
    }

    #[test]
    fn test_replace_to_wraps_code_and_value() {
        let source = "$executeCodeAndReplaceTo(\"int  generated;\", log(\"a\", 1);\n  count++;)";
        let marker = expand("executeCodeAndReplaceTo", &args_of(source), source);
        assert_eq!(
            marker.as_deref(),
            Some(
                "{gen};{executeCodeAndReplace};[&]() {log(\"a\", 1); count++;\
                 return new std::optional<std::string>{\"int  generated;\"};}();"
            )
        );
    }

    #[test]
    fn test_replace_to_without_code() {
        let source = "$executeCodeAndReplaceTo(make_text(1, 2))";
        let marker = expand("executeCodeAndReplaceTo", &args_of(source), source);
        assert_eq!(
            marker.as_deref(),
            Some(
                "{gen};{executeCodeAndReplace};[&]() {\
                 return new std::optional<std::string>{make_text(1, 2)};}();"
            )
        );
    }

    #[test]
    fn test_unknown_shorthand() {
        assert_eq!(expand("unknown", &[], ""), None);
    }

    #[test]
    fn test_comment_between_tokens_collapses() {
        let source = "$apply(a /* note */ b)";
        let marker = expand("apply", &args_of(source), source);
        assert_eq!(marker.as_deref(), Some("{gen};{funccall};a b"));
    }
}
