//! Decoded annotation commands.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Set of free-form flag tokens from an `attr` marker.
///
/// Ordered so that anything derived from it is deterministic.
pub type FlagSet = BTreeSet<String>;

/// Flag that opts a member into reflection tables.
pub const REFLECTABLE_FLAG: &str = "reflectable";

/// The command names accepted inside `{...}` after the `{gen};` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Attr,
    FuncCall,
    ExecuteCode,
    ExecuteCodeAndReplace,
    ExecuteStringWithoutSpaces,
}

impl CommandName {
    pub const ALL: [CommandName; 5] = [
        CommandName::Attr,
        CommandName::FuncCall,
        CommandName::ExecuteCode,
        CommandName::ExecuteCodeAndReplace,
        CommandName::ExecuteStringWithoutSpaces,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandName::Attr => "attr",
            CommandName::FuncCall => "funccall",
            CommandName::ExecuteCode => "executeCode",
            CommandName::ExecuteCodeAndReplace => "executeCodeAndReplace",
            CommandName::ExecuteStringWithoutSpaces => "executeStringWithoutSpaces",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", content = "payload", rename_all = "snake_case")]
pub enum Command {
    /// Flags for classification; never dispatched
    Attribute(FlagSet),
    /// Invoke the named handler with the declaration as context
    FunctionCall(String),
    /// Run code for effect; the marker site is erased
    ExecuteCode(String),
    /// Run code; its result, if any, replaces the marker site
    ExecuteAndReplace(String),
}

impl Command {
    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Attribute(_) => "attribute",
            Command::FunctionCall(_) => "function_call",
            Command::ExecuteCode(_) => "execute_code",
            Command::ExecuteAndReplace(_) => "execute_and_replace",
        }
    }

    /// Whether this is an `attr` command carrying `flag`.
    pub fn has_flag(&self, flag: &str) -> bool {
        matches!(self, Command::Attribute(flags) if flags.contains(flag))
    }
}
