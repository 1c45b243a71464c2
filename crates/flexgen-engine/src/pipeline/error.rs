//! Errors that abort processing of a file.

use crate::dispatch::{DispatchError, HandlerError};
use crate::frontend::{FrontendError, Span};
use crate::interpreter::InterpreterError;
use crate::rewrite::RewriteError;
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The file could not be scanned
    #[error(transparent)]
    Frontend(#[from] FrontendError),

    /// A `funccall` marker names no registered handler
    #[error("{decl}: {source} (marker \"{marker}\")")]
    Dispatch {
        decl: String,
        span: Span,
        marker: String,
        #[source]
        source: DispatchError,
    },

    /// A handler returned an error
    #[error("handler '{handler}' failed on {decl}: {source}")]
    Handler {
        handler: String,
        decl: String,
        span: Span,
        #[source]
        source: HandlerError,
    },

    #[error("{decl}: marker \"{marker}\" needs an interpreter but none is configured")]
    InterpreterUnavailable {
        decl: String,
        span: Span,
        marker: String,
    },

    #[error("interpreter failed on {decl}: {source}")]
    Interpreter {
        decl: String,
        span: Span,
        #[source]
        source: InterpreterError,
    },

    /// Queued edits could not be applied
    #[error("conflicting edits: {0}")]
    Rewrite(#[from] RewriteError),
}

impl PipelineError {
    /// Stable error code (e.g. "G0002")
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Frontend(_) => "G0001",
            PipelineError::Dispatch { .. } => "G0002",
            PipelineError::Handler { .. } => "G0003",
            PipelineError::InterpreterUnavailable { .. } => "G0004",
            PipelineError::Interpreter { .. } => "G0005",
            PipelineError::Rewrite(_) => "G0006",
        }
    }

    /// Location in the source, if the error has one with a line and column.
    pub fn span(&self) -> Option<Span> {
        match self {
            PipelineError::Frontend(err) => err.messages().first().map(|(span, _)| *span),
            PipelineError::Dispatch { span, .. } => Some(*span),
            PipelineError::Handler { span, .. } => Some(*span),
            PipelineError::InterpreterUnavailable { span, .. } => Some(*span),
            PipelineError::Interpreter { span, .. } => Some(*span),
            PipelineError::Rewrite(_) => None,
        }
    }

    /// Byte range in the source the error points at.
    pub fn byte_range(&self) -> Option<Range<usize>> {
        match self {
            PipelineError::Rewrite(RewriteError::Overlapping { second, .. }) => {
                Some(second.clone())
            }
            PipelineError::Rewrite(RewriteError::OutOfBounds { .. }) => None,
            _ => self.span().map(|span| span.start..span.end),
        }
    }

    /// Whether `keep_going` may turn this error into a diagnostic.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PipelineError::Handler { .. } | PipelineError::Interpreter { .. }
        )
    }
}
