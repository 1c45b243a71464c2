//! C++ declaration front end.
//!
//! Turns source text into a [`DeclTree`]: the declarations of the file, with
//! their extents, names, types and the annotation markers written on them.
//! It is a scanner, not a compiler front end; macros other than the `$`
//! annotation shorthands are not expanded and names are not resolved.

pub mod decl;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod token;

pub use decl::{Access, Annotation, Decl, DeclId, DeclKind, DeclRef, DeclTree, RecordTag};
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, ParseErrorKind, Parser};
pub use token::{Span, Token};

/// Errors that stop a file from being scanned.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FrontendError {
    #[error("{}", summarize("lexical", .0))]
    Lex(Vec<LexError>),

    #[error("{}", summarize("parse", .0))]
    Parse(Vec<ParseError>),
}

fn summarize<E: std::fmt::Display>(what: &str, errors: &[E]) -> String {
    match errors.first() {
        Some(first) => format!("{} {} error(s), first: {}", errors.len(), what, first),
        None => format!("no {} errors", what),
    }
}

impl FrontendError {
    /// Location and message of every error.
    pub fn messages(&self) -> Vec<(Span, String)> {
        match self {
            FrontendError::Lex(errors) => errors
                .iter()
                .map(|e| (*e.span(), e.description()))
                .collect(),
            FrontendError::Parse(errors) => {
                errors.iter().map(|e| (e.span, e.message.clone())).collect()
            }
        }
    }
}

/// Scan `source` into a declaration tree.
pub fn parse_source(source: &str) -> Result<DeclTree, FrontendError> {
    let parser = Parser::new(source).map_err(FrontendError::Lex)?;
    parser.parse().map_err(FrontendError::Parse)
}
