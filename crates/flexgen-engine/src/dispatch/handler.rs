//! Handler trait, the context handlers run against, and their results.

use crate::annotation::FlagSet;
use crate::frontend::{DeclId, DeclRef};
use crate::interpreter::SharedInterpreter;
use crate::rewrite::Placement;
use rustc_hash::FxHashMap;
use std::path::Path;

/// Error type handlers may fail with.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// What a handler wants done to the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResult {
    NoEffect,
    /// Replace the declaration's full extent
    Replace(String),
    /// Insert text at a byte offset
    Insert {
        anchor: usize,
        text: String,
        placement: Placement,
    },
}

/// Flag sets of record members, keyed by member.
pub type MemberFlags = FxHashMap<DeclId, FlagSet>;

static NO_FLAGS: FlagSet = FlagSet::new();

/// Read-only view handed to a handler for one invocation.
pub struct HandlerContext<'t> {
    decl: DeclRef<'t>,
    source: &'t str,
    member_flags: &'t MemberFlags,
    interpreter: Option<&'t SharedInterpreter>,
    path: Option<&'t Path>,
}

impl<'t> HandlerContext<'t> {
    pub fn new(decl: DeclRef<'t>, source: &'t str, member_flags: &'t MemberFlags) -> Self {
        Self {
            decl,
            source,
            member_flags,
            interpreter: None,
            path: None,
        }
    }

    pub fn with_interpreter(mut self, interpreter: Option<&'t SharedInterpreter>) -> Self {
        self.interpreter = interpreter;
        self
    }

    pub fn with_path(mut self, path: Option<&'t Path>) -> Self {
        self.path = path;
        self
    }

    /// The declaration the marker was written on.
    pub fn decl(&self) -> DeclRef<'t> {
        self.decl
    }

    /// Full text of the file being processed.
    pub fn source(&self) -> &'t str {
        self.source
    }

    /// Source text of the declaration.
    pub fn decl_text(&self) -> &'t str {
        self.decl.span().slice(self.source)
    }

    /// Flags a member was classified with (empty if none).
    pub fn flags(&self, member: DeclId) -> &'t FlagSet {
        self.member_flags.get(&member).unwrap_or(&NO_FLAGS)
    }

    pub fn has_flag(&self, member: DeclId, flag: &str) -> bool {
        self.flags(member).contains(flag)
    }

    pub fn interpreter(&self) -> Option<&'t SharedInterpreter> {
        self.interpreter
    }

    pub fn path(&self) -> Option<&'t Path> {
        self.path
    }
}

/// A named code generator.
///
/// Any `Fn(&HandlerContext) -> Result<HandlerResult, HandlerError>` closure
/// is a handler.
pub trait Handler: Send + Sync {
    fn run(&self, ctx: &HandlerContext<'_>) -> Result<HandlerResult, HandlerError>;

    /// One-line summary shown by `flexgen handlers`.
    fn description(&self) -> &str {
        ""
    }
}

impl<F> Handler for F
where
    F: Fn(&HandlerContext<'_>) -> Result<HandlerResult, HandlerError> + Send + Sync,
{
    fn run(&self, ctx: &HandlerContext<'_>) -> Result<HandlerResult, HandlerError> {
        self(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parse_source;

    #[test]
    fn test_context_flags_default_empty() {
        let source = "struct S { int a; int b; };";
        let tree = parse_source(source).unwrap();
        let record = tree.root_node().members().next().unwrap();
        let members: Vec<_> = record.members().map(|m| m.id()).collect();

        let mut flags = MemberFlags::default();
        flags.insert(members[0], ["reflectable".to_string()].into_iter().collect());

        let ctx = HandlerContext::new(record, source, &flags);
        assert!(ctx.has_flag(members[0], "reflectable"));
        assert!(ctx.flags(members[1]).is_empty());
        assert_eq!(ctx.decl_text(), source);
        assert!(ctx.interpreter().is_none());
    }

    #[test]
    fn test_closure_is_handler() {
        let source = "int x;";
        let tree = parse_source(source).unwrap();
        let decl = tree.root_node().members().next().unwrap();
        let flags = MemberFlags::default();
        let ctx = HandlerContext::new(decl, source, &flags);

        let handler = |ctx: &HandlerContext<'_>| -> Result<HandlerResult, HandlerError> {
            Ok(HandlerResult::Replace(ctx.decl().name().to_uppercase()))
        };
        assert_eq!(handler.run(&ctx).unwrap(), HandlerResult::Replace("X".into()));
        assert_eq!(handler.description(), "");
    }
}
