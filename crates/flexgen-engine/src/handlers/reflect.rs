//! `make_reflect`: name-to-type lookup tables for a record's reflectable
//! members.
//!
//! Every direct field or method of the record carrying the `reflectable`
//! flag contributes one entry. The tables are inserted just before the
//! record's closing brace:
//!
//! ```text
//!
//!   public:
//!     static std::map<std::string, std::string> fields = {
//!       { "m_VecStr2", "std::vector<std::string>" }
//!     };
//!
//!     static std::map<std::string, std::string> methods = {
//!     };
//! ```

use crate::annotation::REFLECTABLE_FLAG;
use crate::dispatch::{Handler, HandlerContext, HandlerError, HandlerResult};
use crate::frontend::{DeclKind, DeclRef, RecordTag};
use crate::rewrite::Placement;
use std::collections::BTreeMap;

/// Registered name of [`MakeReflect`].
pub const MAKE_REFLECT: &str = "make_reflect";

const TABLE_TYPE: &str = "std::map<std::string, std::string>";

/// Reflection handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeReflect;

impl Handler for MakeReflect {
    fn run(&self, ctx: &HandlerContext<'_>) -> Result<HandlerResult, HandlerError> {
        let record = ctx.decl();
        let DeclKind::Record { tag } = record.kind() else {
            tracing::debug!(decl = %record.describe(), "make_reflect on non-record, skipping");
            return Ok(HandlerResult::NoEffect);
        };
        let Some(close) = record.decl().body_close else {
            return Ok(HandlerResult::NoEffect);
        };
        if has_generated_tables(record) {
            tracing::debug!(record = %record.qualified_name(), "reflection tables already present");
            return Ok(HandlerResult::NoEffect);
        }

        let table = MemberTable::collect(ctx, *tag);
        tracing::debug!(
            record = %record.qualified_name(),
            fields = table.fields.len(),
            methods = table.methods.len(),
            "generated reflection tables"
        );
        Ok(HandlerResult::Insert {
            anchor: close.start,
            text: table.render(),
            placement: Placement::After,
        })
    }

    fn description(&self) -> &str {
        "Generate `fields` and `methods` lookup tables for members marked reflectable"
    }
}

/// Reflectable members of one record, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberTable {
    /// Field name to declared type, top-level cv removed
    pub fields: BTreeMap<String, String>,
    /// Method name to return type
    pub methods: BTreeMap<String, String>,
}

impl MemberTable {
    /// Collect the reflectable direct members of the context's record.
    pub fn collect(ctx: &HandlerContext<'_>, tag: RecordTag) -> Self {
        let mut table = Self::default();
        let mut access = tag.default_access();

        for member in ctx.decl().members() {
            match member.kind() {
                DeclKind::AccessSpec { access: next } => {
                    access = *next;
                    tracing::trace!(access = access.as_str(), "access specifier");
                }
                DeclKind::Method { return_type } if ctx.has_flag(member.id(), REFLECTABLE_FLAG) => {
                    tracing::trace!(
                        method = member.name(),
                        access = access.as_str(),
                        "reflect method"
                    );
                    table
                        .methods
                        .insert(member.name().to_string(), return_type.clone());
                }
                DeclKind::Field { ty } if ctx.has_flag(member.id(), REFLECTABLE_FLAG) => {
                    tracing::trace!(
                        field = member.name(),
                        access = access.as_str(),
                        "reflect field"
                    );
                    table
                        .fields
                        .insert(member.name().to_string(), strip_top_level_cv(ty));
                }
                _ => {}
            }
        }
        table
    }

    /// The generated table text, fields first.
    pub fn render(&self) -> String {
        let mut out = String::from("\n  public:\n");
        render_map(&mut out, "fields", &self.fields);
        out.push('\n');
        render_map(&mut out, "methods", &self.methods);
        out
    }
}

fn render_map(out: &mut String, name: &str, entries: &BTreeMap<String, String>) {
    out.push_str(&format!("    static {} {} = {{\n", TABLE_TYPE, name));
    for (key, value) in entries {
        out.push_str(&format!("      {{ \"{}\", \"{}\" }}\n", key, value));
    }
    out.push_str("    };\n");
}

fn has_generated_tables(record: DeclRef<'_>) -> bool {
    let is_table = |name: &str| {
        record.members().any(|member| {
            member.name() == name
                && matches!(
                    member.kind(),
                    DeclKind::Field { ty } | DeclKind::Variable { ty } if ty == TABLE_TYPE
                )
        })
    };
    is_table("fields") && is_table("methods")
}

/// Remove top-level `const`/`volatile` from a rendered type string.
///
/// For pointer and reference types only the qualifiers after the last
/// top-level `*` or `&` apply to the member itself.
pub fn strip_top_level_cv(ty: &str) -> String {
    let pieces = split_pieces(ty);

    let mut depth = 0i32;
    let mut last_declarator = None;
    for (i, piece) in pieces.iter().enumerate() {
        match *piece {
            "<" | "(" | "[" => depth += 1,
            ">" | ")" | "]" => depth -= 1,
            "*" | "&" if depth == 0 => last_declarator = Some(i),
            _ => {}
        }
    }
    let first_stripped = last_declarator.map_or(0, |i| i + 1);

    let mut depth = 0i32;
    let mut kept = Vec::with_capacity(pieces.len());
    for (i, piece) in pieces.into_iter().enumerate() {
        match piece {
            "<" | "(" | "[" => depth += 1,
            ">" | ")" | "]" => depth -= 1,
            "const" | "volatile" if depth == 0 && i >= first_stripped => continue,
            _ => {}
        }
        kept.push(piece);
    }
    join_pieces(&kept)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Words and single punctuation characters; whitespace is dropped.
fn split_pieces(ty: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut chars = ty.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        let mut end = start + c.len_utf8();
        if is_word_char(c) {
            while let Some(&(i, next)) = chars.peek() {
                if !is_word_char(next) {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }
        }
        pieces.push(&ty[start..end]);
    }
    pieces
}

fn join_pieces(pieces: &[&str]) -> String {
    let mut out = String::new();
    let mut prev: Option<&str> = None;
    for piece in pieces {
        if let Some(prev) = prev {
            let word = |s: &str| s.chars().next().is_some_and(is_word_char);
            if (word(prev) && word(piece)) || prev == "," {
                out.push(' ');
            }
        }
        out.push_str(piece);
        prev = Some(piece);
    }
    out
}
