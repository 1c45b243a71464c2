//! Marker decoding.
//!
//! Grammar: `{gen};{<command-name>};<payload>`. This is the only place raw
//! marker strings are interpreted.

use super::command::{Command, CommandName, FlagSet};
use thiserror::Error;

/// Literal prefix every generator marker starts with.
pub const GEN_PREFIX: &str = "{gen};";

/// Separator between `attr` flag tokens.
pub const FLAG_DELIMITER: char = ';';

/// Why a marker did not decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Not addressed to the generator; an ordinary annotation
    #[error("not a generator marker")]
    NotAGenMarker,

    #[error("unknown command name '{name}'")]
    UnknownCommandName { name: String },

    #[error("malformed marker: {reason}")]
    MalformedPayload { reason: String },
}

impl DecodeError {
    /// Markers that fail this way are skipped without a warning.
    pub fn is_silent(&self) -> bool {
        matches!(self, DecodeError::NotAGenMarker)
    }

    fn malformed(reason: &str) -> Self {
        DecodeError::MalformedPayload {
            reason: reason.to_string(),
        }
    }
}

/// Decode one marker into a [`Command`].
pub fn decode(marker: &str) -> Result<Command, DecodeError> {
    let rest = marker
        .strip_prefix(GEN_PREFIX)
        .ok_or(DecodeError::NotAGenMarker)?;

    let rest = rest
        .strip_prefix('{')
        .ok_or_else(|| DecodeError::malformed("expected '{' before the command name"))?;
    let close = rest
        .find('}')
        .ok_or_else(|| DecodeError::malformed("missing '}' after the command name"))?;
    let name = &rest[..close];
    let after = &rest[close + 1..];

    let payload = if after.is_empty() {
        ""
    } else {
        after
            .strip_prefix(';')
            .ok_or_else(|| DecodeError::malformed("expected ';' after the command name"))?
    };

    let command = CommandName::parse(name).ok_or_else(|| DecodeError::UnknownCommandName {
        name: name.to_string(),
    })?;

    match command {
        CommandName::Attr => Ok(Command::Attribute(split_flags(payload))),
        CommandName::FuncCall => {
            let handler = payload.trim();
            if handler.is_empty() {
                return Err(DecodeError::malformed("empty handler name"));
            }
            Ok(Command::FunctionCall(handler.to_string()))
        }
        CommandName::ExecuteCode | CommandName::ExecuteStringWithoutSpaces => {
            Ok(Command::ExecuteCode(code_payload(payload)))
        }
        CommandName::ExecuteCodeAndReplace => Ok(Command::ExecuteAndReplace(code_payload(payload))),
    }
}

/// Union of the flags of every `attr` marker in `markers`.
///
/// Other commands and markers that fail to decode contribute nothing.
pub fn decode_attributes<'m>(markers: impl IntoIterator<Item = &'m str>) -> FlagSet {
    let mut flags = FlagSet::new();
    for marker in markers {
        if let Ok(Command::Attribute(set)) = decode(marker) {
            flags.extend(set);
        }
    }
    flags
}

/// N delimiters yield N+1 tokens; the trailing fragment (possibly empty)
/// is a token too.
fn split_flags(payload: &str) -> FlagSet {
    payload
        .split(FLAG_DELIMITER)
        .map(str::to_string)
        .collect()
}

/// A code payload wrapped in one pair of double quotes is unquoted and its
/// `\"` and `\\` escapes are undone. Anything else passes through verbatim.
fn code_payload(payload: &str) -> String {
    let trimmed = payload.trim();
    let quoted = trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"');
    if !quoted {
        return payload.to_string();
    }

    let inner = &trimmed[1..trimmed.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '"' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}
