//! Lexer for C++ source files.
//!
//! Regular tokens are recognized by a logos-generated automaton. Trivia that
//! depends on line position (preprocessor directives, line splices) and
//! constructs with dynamic delimiters (raw strings, block comments) are
//! handled by the manual loop in [`Lexer::tokenize`] before logos sees the
//! input.

use crate::frontend::token::{Span, Token};
use logos::Logos;
use std::string::FromUtf8Error;

/// Logos-based token enum for lexing.
///
/// Converted to [`Token`] after lexing.
#[derive(Logos, Debug, Clone, PartialEq)]
enum LogosToken {
    // Keywords (must come before identifiers)
    #[token("struct")]
    Struct,

    #[token("class")]
    Class,

    #[token("union")]
    Union,

    #[token("enum")]
    Enum,

    #[token("namespace")]
    Namespace,

    #[token("public")]
    Public,

    #[token("private")]
    Private,

    #[token("protected")]
    Protected,

    #[token("template")]
    Template,

    #[token("typedef")]
    Typedef,

    #[token("using")]
    Using,

    #[token("operator")]
    Operator,

    #[token("extern")]
    Extern,

    #[token("friend")]
    Friend,

    #[token("static_assert")]
    StaticAssert,

    #[token("__attribute__")]
    #[token("__attribute")]
    Attribute,

    // Identifiers (must come after keywords)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Annotation shorthands: $apply(...), $executeCodeAndReplace(...)
    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Macro(String),

    // Strings (with optional encoding prefix and line splices)
    #[regex(r#"(u8|u|U|L)?"([^"\\\n]|\\[^\n]|\\\r?\n)*""#, parse_string)]
    StringLiteral(String),

    #[regex(r"(u8|u|U|L)?'([^'\\\n]|\\[^\n])*'")]
    CharLiteral,

    // pp-number: digits, digit separators, suffixes, exponents
    #[regex(r"[0-9][0-9a-zA-Z_.']*")]
    #[regex(r"\.[0-9][0-9a-zA-Z_.']*")]
    Number,

    // Multi-character operators (before single characters)
    #[token("::")]
    ColonColon,

    #[token("->")]
    Arrow,

    #[token("...")]
    Ellipsis,

    #[token("&&")]
    AmpAmp,

    // Single-character tokens
    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token("=")]
    Equal,

    #[token("*")]
    Star,

    #[token("&")]
    Amp,

    #[token("~")]
    Tilde,

    #[regex(r"[-+/%^|!?.@#]")]
    Punct,
}

/// Raw text between the quotes; escapes are undone in [`Lexer::tokenize`]
/// so that a bad escape can be reported with its span.
fn parse_string(lex: &mut logos::Lexer<LogosToken>) -> Option<String> {
    let s = lex.slice();
    let open = s.find('"')?;
    Some(s[open + 1..s.len() - 1].to_string())
}

/// Undo C++ escape sequences and remove line splices.
///
/// `\x` and octal escapes produce raw bytes, so `"\xc3\xa9"` is `é`. Fails
/// if the bytes do not form valid UTF-8.
pub fn unescape_string(s: &str) -> Result<String, FromUtf8Error> {
    let mut result: Vec<u8> = Vec::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            push_char(&mut result, c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push(b'\n'),
            Some('t') => result.push(b'\t'),
            Some('r') => result.push(b'\r'),
            Some('0') if !matches!(chars.peek(), Some('0'..='7')) => result.push(0),
            Some('a') => result.push(0x07),
            Some('b') => result.push(0x08),
            Some('f') => result.push(0x0c),
            Some('v') => result.push(0x0b),
            Some('\\') => result.push(b'\\'),
            Some('"') => result.push(b'"'),
            Some('\'') => result.push(b'\''),
            Some('?') => result.push(b'?'),
            // Line splice
            Some('\n') => {}
            Some('\r') => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            Some('x') => {
                let mut hex = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_ascii_hexdigit() && hex.len() < 2 {
                        hex.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte),
                    Err(_) => {
                        result.extend_from_slice(b"\\x");
                        result.extend_from_slice(hex.as_bytes());
                    }
                }
            }
            Some(d @ '0'..='7') => {
                let mut oct = String::from(d);
                while let Some(&ch) = chars.peek() {
                    if ('0'..='7').contains(&ch) && oct.len() < 3 {
                        oct.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match u8::from_str_radix(&oct, 8) {
                    Ok(byte) => result.push(byte),
                    Err(_) => {
                        result.push(b'\\');
                        result.extend_from_slice(oct.as_bytes());
                    }
                }
            }
            Some(other) => {
                result.push(b'\\');
                push_char(&mut result, other);
            }
            None => result.push(b'\\'),
        }
    }

    String::from_utf8(result)
}

fn push_char(bytes: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

/// C++ lexer producing `(Token, Span)` pairs.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    /// Only whitespace has been seen since the last newline
    at_line_start: bool,
    conditionals: Conditionals,
    tokens: Vec<(Token, Span)>,
    errors: Vec<LexError>,
}

/// Lexical errors.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    UnexpectedCharacter { char: char, span: Span },
    UnterminatedString { span: Span },
    UnterminatedRawString { delimiter: String, span: Span },
    UnterminatedComment { span: Span },
    InvalidEscape { span: Span },
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            at_line_start: true,
            conditionals: Conditionals::default(),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Format all errors with source context
    pub fn format_errors(errors: &[LexError], source: &str) -> String {
        errors
            .iter()
            .map(|e| e.format_with_source(source))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn tokenize(mut self) -> Result<Vec<(Token, Span)>, Vec<LexError>> {
        while self.pos < self.source.len() {
            self.skip_trivia();
            if self.pos >= self.source.len() {
                break;
            }

            if let Some(prefix_len) = self.raw_string_prefix() {
                self.lex_raw_string(prefix_len);
                continue;
            }

            let mut logos_lexer = LogosToken::lexer(&self.source[self.pos..]);
            let Some(token_result) = logos_lexer.next() else {
                break;
            };
            let range = logos_lexer.span();
            let abs_start = self.pos + range.start;
            let abs_end = self.pos + range.end;

            match token_result {
                Ok(LogosToken::StringLiteral(raw)) => {
                    let span = self.span_at(abs_start, abs_end);
                    match unescape_string(&raw) {
                        Ok(text) => self.tokens.push((Token::StringLiteral(text), span)),
                        Err(_) => self.errors.push(LexError::InvalidEscape { span }),
                    }
                    self.advance_to(abs_end);
                }
                Ok(logos_token) => {
                    let span = self.span_at(abs_start, abs_end);
                    self.tokens.push((convert_token(logos_token), span));
                    self.advance_to(abs_end);
                }
                Err(_) => {
                    let ch = self.source[abs_start..].chars().next().unwrap_or('\0');
                    if ch == '"' || ch == '\'' || self.starts_prefixed_literal(abs_start) {
                        // Skip the rest of the line for recovery
                        let line_end = self.source[abs_start..]
                            .find('\n')
                            .map(|i| abs_start + i)
                            .unwrap_or(self.source.len());
                        let span = self.span_at(abs_start, line_end);
                        self.errors.push(LexError::UnterminatedString { span });
                        self.advance_to(line_end);
                    } else {
                        let end = abs_start + ch.len_utf8().max(1);
                        let span = self.span_at(abs_start, end);
                        self.errors.push(LexError::UnexpectedCharacter { char: ch, span });
                        self.advance_to(end);
                    }
                }
            }
            self.at_line_start = false;
        }

        let eof_span = Span::new(self.source.len(), self.source.len(), self.line, self.column);
        self.tokens.push((Token::Eof, eof_span));

        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }

    fn span_at(&self, start: usize, end: usize) -> Span {
        Span::new(start, end, self.line, self.column)
    }

    /// Move `pos` forward, keeping line and column in sync.
    fn advance_to(&mut self, new_pos: usize) {
        for c in self.source[self.pos..new_pos].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
                self.at_line_start = true;
            } else {
                self.column += 1;
            }
        }
        self.pos = new_pos;
    }

    /// Skip whitespace, comments, line splices, preprocessor directives and
    /// conditional arms that are not taken.
    fn skip_trivia(&mut self) {
        let bytes = self.source.as_bytes();
        while self.pos < bytes.len() {
            if !self.conditionals.is_active() {
                self.skip_inactive_line();
                continue;
            }
            match bytes[self.pos] {
                b' ' | b'\t' | b'\r' | b'\n' | b'\x0c' | b'\x0b' => {
                    self.advance_to(self.pos + 1);
                }
                b'\\' if self.is_line_splice(self.pos) => {
                    let end = self.line_end_after(self.pos + 1);
                    self.advance_to(end);
                }
                b'/' if bytes.get(self.pos + 1) == Some(&b'/') => {
                    let end = self.source[self.pos..]
                        .find('\n')
                        .map(|i| self.pos + i)
                        .unwrap_or(bytes.len());
                    self.advance_to(end);
                }
                b'/' if bytes.get(self.pos + 1) == Some(&b'*') => {
                    match self.source[self.pos + 2..].find("*/") {
                        Some(i) => {
                            let end = self.pos + 2 + i + 2;
                            self.advance_to(end);
                        }
                        None => {
                            let span = self.span_at(self.pos, self.pos + 2);
                            self.errors.push(LexError::UnterminatedComment { span });
                            self.advance_to(bytes.len());
                        }
                    }
                }
                b'#' if self.at_line_start => self.directive(),
                _ => break,
            }
        }
    }

    /// Consume a directive line starting at `#`, tracking conditionals.
    fn directive(&mut self) {
        let source = self.source;
        let end = self.directive_end(self.pos);
        self.conditionals.apply(&source[self.pos + 1..end]);
        self.advance_to(end);
    }

    /// Skip one line of a conditional arm that is not taken. Directive lines
    /// are still read so the arm's end is found.
    fn skip_inactive_line(&mut self) {
        let bytes = self.source.as_bytes();
        while self.pos < bytes.len()
            && matches!(bytes[self.pos], b' ' | b'\t' | b'\x0c' | b'\x0b')
        {
            self.advance_to(self.pos + 1);
        }
        if self.pos >= bytes.len() {
            return;
        }
        if bytes[self.pos] == b'#' && self.at_line_start {
            self.directive();
        } else {
            let end = self.directive_end(self.pos);
            self.advance_to((end + 1).min(bytes.len()));
        }
    }

    /// `\` followed by optional `\r` and a newline.
    fn is_line_splice(&self, pos: usize) -> bool {
        let rest = &self.source.as_bytes()[pos + 1..];
        matches!(rest, [b'\n', ..] | [b'\r', b'\n', ..])
    }

    /// Position just past the newline that starts at or after `pos`.
    fn line_end_after(&self, pos: usize) -> usize {
        self.source[pos..]
            .find('\n')
            .map(|i| pos + i + 1)
            .unwrap_or(self.source.len())
    }

    /// End of a preprocessor directive, following line splices.
    fn directive_end(&self, start: usize) -> usize {
        let bytes = self.source.as_bytes();
        let mut pos = start;
        while pos < bytes.len() {
            match bytes[pos] {
                b'\n' => return pos,
                b'\\' if self.is_line_splice(pos) => pos = self.line_end_after(pos + 1),
                _ => pos += 1,
            }
        }
        pos
    }

    fn starts_prefixed_literal(&self, pos: usize) -> bool {
        let rest = &self.source[pos..];
        ["u8\"", "u\"", "U\"", "L\"", "u8'", "u'", "U'", "L'"]
            .iter()
            .any(|p| rest.starts_with(p))
    }

    /// Length of a raw string prefix (`R"`, `u8R"`, ...) at `pos`, if any.
    fn raw_string_prefix(&self) -> Option<usize> {
        let rest = &self.source[self.pos..];
        ["R\"", "u8R\"", "uR\"", "UR\"", "LR\""]
            .iter()
            .find(|p| rest.starts_with(*p))
            .map(|p| p.len())
    }

    /// Lex `R"delim( ... )delim"`; `prefix_len` covers everything up to and
    /// including the opening quote.
    fn lex_raw_string(&mut self, prefix_len: usize) {
        let start = self.pos;
        let body_start = start + prefix_len;
        let Some(paren) = self.source[body_start..].find('(') else {
            let span = self.span_at(start, body_start);
            self.errors.push(LexError::UnterminatedRawString {
                delimiter: String::new(),
                span,
            });
            self.advance_to(body_start);
            return;
        };
        let delimiter = &self.source[body_start..body_start + paren];
        let content_start = body_start + paren + 1;
        let closing = format!("){}\"", delimiter);

        match self.source[content_start..].find(&closing) {
            Some(i) => {
                let content = &self.source[content_start..content_start + i];
                let end = content_start + i + closing.len();
                let span = self.span_at(start, end);
                self.tokens.push((Token::StringLiteral(content.to_string()), span));
                self.advance_to(end);
                self.at_line_start = false;
            }
            None => {
                let span = self.span_at(start, content_start);
                self.errors.push(LexError::UnterminatedRawString {
                    delimiter: delimiter.to_string(),
                    span,
                });
                self.advance_to(self.source.len());
            }
        }
    }
}

/// One `#if` ... `#endif` group.
#[derive(Debug, Clone, Copy)]
struct ConditionalFrame {
    /// The enclosing group is active
    parent_active: bool,
    /// Some arm of this group has been taken
    taken: bool,
    /// The current arm is taken
    active: bool,
}

/// Stack of open preprocessor conditionals.
///
/// Exactly one arm of each group is scanned. A condition is false only when
/// it is a literal zero (`#if 0`, `#elif false`); any other condition is
/// assumed true, so the first such arm wins.
#[derive(Debug, Default)]
struct Conditionals {
    frames: Vec<ConditionalFrame>,
}

impl Conditionals {
    fn is_active(&self) -> bool {
        self.frames
            .last()
            .map_or(true, |frame| frame.parent_active && frame.active)
    }

    /// Apply a directive; `text` is everything after the `#`.
    fn apply(&mut self, text: &str) {
        let text = text.trim_start();
        let name_len = text
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(text.len());
        let (name, condition) = text.split_at(name_len);

        match name {
            "if" | "ifdef" | "ifndef" => {
                let active = name != "if" || condition_holds(condition);
                self.frames.push(ConditionalFrame {
                    parent_active: self.is_active(),
                    taken: active,
                    active,
                });
            }
            "elif" | "elifdef" | "elifndef" => {
                if let Some(frame) = self.frames.last_mut() {
                    let active =
                        !frame.taken && (name != "elif" || condition_holds(condition));
                    frame.active = active;
                    frame.taken |= active;
                }
            }
            "else" => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.active = !frame.taken;
                    frame.taken = true;
                }
            }
            "endif" => {
                self.frames.pop();
            }
            _ => {}
        }
    }
}

fn condition_holds(condition: &str) -> bool {
    let condition = condition
        .split("//")
        .next()
        .and_then(|c| c.split("/*").next())
        .unwrap_or_default()
        .trim();
    let literal = condition.trim_end_matches(['u', 'U', 'l', 'L']);
    !(condition == "false" || (!literal.is_empty() && literal.bytes().all(|b| b == b'0')))
}

fn convert_token(logos_token: LogosToken) -> Token {
    match logos_token {
        LogosToken::Struct => Token::Struct,
        LogosToken::Class => Token::Class,
        LogosToken::Union => Token::Union,
        LogosToken::Enum => Token::Enum,
        LogosToken::Namespace => Token::Namespace,
        LogosToken::Public => Token::Public,
        LogosToken::Private => Token::Private,
        LogosToken::Protected => Token::Protected,
        LogosToken::Template => Token::Template,
        LogosToken::Typedef => Token::Typedef,
        LogosToken::Using => Token::Using,
        LogosToken::Operator => Token::Operator,
        LogosToken::Extern => Token::Extern,
        LogosToken::Friend => Token::Friend,
        LogosToken::StaticAssert => Token::StaticAssert,
        LogosToken::Attribute => Token::Attribute,
        LogosToken::Identifier(s) => Token::Identifier(s),
        LogosToken::Macro(s) => Token::Macro(s),
        LogosToken::StringLiteral(s) => Token::StringLiteral(s),
        LogosToken::CharLiteral => Token::CharLiteral,
        LogosToken::Number => Token::Number,
        LogosToken::ColonColon => Token::ColonColon,
        LogosToken::Arrow => Token::Arrow,
        LogosToken::Ellipsis => Token::Ellipsis,
        LogosToken::AmpAmp => Token::AmpAmp,
        LogosToken::LeftParen => Token::LeftParen,
        LogosToken::RightParen => Token::RightParen,
        LogosToken::LeftBrace => Token::LeftBrace,
        LogosToken::RightBrace => Token::RightBrace,
        LogosToken::LeftBracket => Token::LeftBracket,
        LogosToken::RightBracket => Token::RightBracket,
        LogosToken::Less => Token::Less,
        LogosToken::Greater => Token::Greater,
        LogosToken::Semicolon => Token::Semicolon,
        LogosToken::Comma => Token::Comma,
        LogosToken::Colon => Token::Colon,
        LogosToken::Equal => Token::Equal,
        LogosToken::Star => Token::Star,
        LogosToken::Amp => Token::Amp,
        LogosToken::Tilde => Token::Tilde,
        LogosToken::Punct => Token::Punct,
    }
}

impl LexError {
    /// Get the span of this error
    pub fn span(&self) -> &Span {
        match self {
            LexError::UnexpectedCharacter { span, .. }
            | LexError::UnterminatedString { span }
            | LexError::UnterminatedRawString { span, .. }
            | LexError::UnterminatedComment { span }
            | LexError::InvalidEscape { span } => span,
        }
    }

    /// Get a description of this error
    pub fn description(&self) -> String {
        match self {
            LexError::UnexpectedCharacter { char, .. } => {
                format!("Unexpected character '{}'", char)
            }
            LexError::UnterminatedString { .. } => "Unterminated string literal".to_string(),
            LexError::UnterminatedRawString { delimiter, .. } => {
                format!("Unterminated raw string literal (delimiter '{}')", delimiter)
            }
            LexError::UnterminatedComment { .. } => "Unterminated block comment".to_string(),
            LexError::InvalidEscape { .. } => {
                "String escapes do not form valid UTF-8".to_string()
            }
        }
    }

    /// Get a hint for fixing this error
    pub fn hint(&self) -> Option<String> {
        match self {
            LexError::UnterminatedString { .. } => {
                Some("Add a closing quote, or end the line with '\\' to continue it".to_string())
            }
            LexError::UnterminatedRawString { delimiter, .. } => {
                Some(format!("Close the raw string with ){}\"", delimiter))
            }
            LexError::UnterminatedComment { .. } => Some("Add a closing */".to_string()),
            LexError::InvalidEscape { .. } => Some(
                "Write non-ASCII text directly, or as complete UTF-8 byte sequences".to_string(),
            ),
            _ => None,
        }
    }

    /// Format the error with source context
    pub fn format_with_source(&self, source: &str) -> String {
        let span = self.span();
        let mut result = String::new();

        result.push_str(&format!(
            "Error at {}:{}: {}\n",
            span.line,
            span.column,
            self.description()
        ));

        if let Some(error_line) = source.lines().nth((span.line as usize).saturating_sub(1)) {
            result.push_str("  |\n");
            result.push_str(&format!("{:3} | {}\n", span.line, error_line));
            result.push_str(&format!(
                "  | {}^\n",
                " ".repeat((span.column as usize).saturating_sub(1))
            ));
        }

        if let Some(hint) = self.hint() {
            result.push_str(&format!("\nHint: {}\n", hint));
        }

        result
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.description(),
            self.span().line,
            self.span().column
        )
    }
}

impl std::error::Error for LexError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        Lexer::new(source)
            .tokenize()
            .expect("should lex")
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let tokens = lex("struct Foo { int m_bar; };");
        assert_eq!(
            tokens,
            vec![
                Token::Struct,
                Token::Identifier("Foo".into()),
                Token::LeftBrace,
                Token::Identifier("int".into()),
                Token::Identifier("m_bar".into()),
                Token::Semicolon,
                Token::RightBrace,
                Token::Semicolon,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        let tokens = lex("structure classy");
        assert_eq!(tokens[0], Token::Identifier("structure".into()));
        assert_eq!(tokens[1], Token::Identifier("classy".into()));
    }

    #[test]
    fn test_preprocessor_lines_skipped() {
        let source = "#include <vector>\n#define X(a) \\\n  a + 1\nint x;";
        let tokens = lex(source);
        assert_eq!(tokens[0], Token::Identifier("int".into()));
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_hash_mid_line_is_punct() {
        let tokens = lex("a # b");
        assert_eq!(tokens[1], Token::Punct);
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = lex("// line\n/* block\n comment */ int /* inline */ x;");
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_string_unescaped() {
        let tokens = lex(r#"annotate("{gen};{attr};\"quoted\"")"#);
        assert_eq!(tokens[2], Token::StringLiteral("{gen};{attr};\"quoted\"".into()));
    }

    #[test]
    fn test_string_with_line_splice() {
        let source = "\"{gen};{executeCode};\\\nprintf(\\\"Hello me!\\\");\"";
        let tokens = lex(source);
        assert_eq!(
            tokens[0],
            Token::StringLiteral("{gen};{executeCode};printf(\"Hello me!\");".into())
        );
    }

    #[test]
    fn test_raw_string() {
        let tokens = lex(r#"R"x(a "quoted" ) text)x" y"#);
        assert_eq!(tokens[0], Token::StringLiteral(r#"a "quoted" ) text"#.into()));
        assert_eq!(tokens[1], Token::Identifier("y".into()));
    }

    #[test]
    fn test_prefixed_string() {
        let tokens = lex(r#"u8"abc""#);
        assert_eq!(tokens[0], Token::StringLiteral("abc".into()));
    }

    #[test]
    fn test_macro_shorthand() {
        let tokens = lex("$apply(make_reflect)");
        assert_eq!(tokens[0], Token::Macro("apply".into()));
        assert_eq!(tokens[1], Token::LeftParen);
    }

    #[test]
    fn test_template_closing_angles_split() {
        let tokens = lex("std::vector<std::vector<int>> v;");
        let greaters = tokens.iter().filter(|t| **t == Token::Greater).count();
        assert_eq!(greaters, 2);
    }

    #[test]
    fn test_span_line_and_column() {
        let tokens = Lexer::new("int\n  x;").tokenize().unwrap();
        let (_, span) = &tokens[1];
        assert_eq!((span.line, span.column), (2, 3));
        assert_eq!((span.start, span.end), (6, 7));
    }

    #[test]
    fn test_unterminated_string() {
        let errors = Lexer::new("\"abc\nint x;").tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::UnterminatedString { .. }));
    }

    #[test]
    fn test_unterminated_comment() {
        let errors = Lexer::new("int x; /* never closed").tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::UnterminatedComment { .. }));
        assert!(errors[0].hint().is_some());
    }

    #[test]
    fn test_hex_escapes_are_bytes() {
        let tokens = lex(r#""caf\xc3\xa9" "\101""#);
        assert_eq!(tokens[0], Token::StringLiteral("café".into()));
        assert_eq!(tokens[1], Token::StringLiteral("A".into()));
    }

    #[test]
    fn test_invalid_utf8_escape() {
        let errors = Lexer::new(r#"annotate("\xff") int x;"#).tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::InvalidEscape { .. }));
        assert!(errors[0].hint().is_some());
    }

    #[test]
    fn test_if_zero_arm_skipped() {
        let tokens = lex("#if 0\nstruct X {\n#else\nstruct X : Y {\n#endif\n int a;\n};");
        assert_eq!(tokens[0], Token::Struct);
        assert_eq!(tokens[2], Token::Colon);
        assert_eq!(tokens.iter().filter(|t| **t == Token::LeftBrace).count(), 1);
    }

    #[test]
    fn test_only_first_unknown_arm_scanned() {
        let source = "#ifdef _WIN32\nint a;\n#elif defined(__APPLE__)\nint b;\n#else\nint c;\n#endif\nint d;";
        let names: Vec<_> = lex(source)
            .into_iter()
            .filter_map(|t| t.ident().map(str::to_string))
            .filter(|name| name != "int")
            .collect();
        assert_eq!(names, vec!["a", "d"]);
    }

    #[test]
    fn test_nested_conditionals_in_dead_arm() {
        let source = "#if 0\n#if 1\nint a;\n#else\nint b;\n#endif\nint c;\n#elif 1 // on\nint d;\n#endif";
        let names: Vec<_> = lex(source)
            .into_iter()
            .filter_map(|t| t.ident().map(str::to_string))
            .collect();
        assert_eq!(names, vec!["int", "d"]);
    }

    #[test]
    fn test_unexpected_character() {
        let errors = Lexer::new("int x = `1`;").tokenize().unwrap_err();
        assert!(matches!(errors[0], LexError::UnexpectedCharacter { char: '`', .. }));
        let formatted = errors[0].format_with_source("int x = `1`;");
        assert!(formatted.contains("Error at 1:9"));
    }
}
