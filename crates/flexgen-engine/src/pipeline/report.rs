//! Per-file results.

use super::error::PipelineError;
use crate::annotation::DecodeError;
use crate::frontend::Span;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Warning codes for recoverable marker problems.
pub const UNKNOWN_COMMAND: &str = "W0001";
pub const MALFORMED_MARKER: &str = "W0002";

/// Position of a diagnostic in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl From<Span> for Location {
    fn from(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
            line: span.line,
            column: span.column,
        }
    }
}

/// A problem found while processing a file that did not stop it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Diagnostic {
    /// Warning for a `{gen}` marker that did not decode.
    pub fn from_decode_error(err: &DecodeError, marker: &str, span: Span) -> Self {
        let code = match err {
            DecodeError::UnknownCommandName { .. } => UNKNOWN_COMMAND,
            _ => MALFORMED_MARKER,
        };
        Self {
            severity: Severity::Warning,
            code,
            message: format!("{} in \"{}\"", err, marker),
            location: Some(span.into()),
        }
    }

    /// Error diagnostic for a failure skipped under `keep_going`.
    pub fn from_error(err: &PipelineError) -> Self {
        Self {
            severity: Severity::Error,
            code: err.code(),
            message: err.to_string(),
            location: err.span().map(Location::from),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Outcome of running the pipeline over one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Rewritten text; equal to the input when nothing changed
    #[serde(skip)]
    pub output: String,
    pub changed: bool,
    /// Number of edits applied
    pub edits: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}
