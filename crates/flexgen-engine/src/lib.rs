//! flexgen engine
//!
//! Source-to-source code generation driven by annotations on C++
//! declarations:
//! - **Front end**: declaration scanner producing a [`DeclTree`] (`frontend`)
//! - **Annotations**: marker decoding into [`Command`]s (`annotation`)
//! - **Dispatch**: handler registry and handler protocol (`dispatch`)
//! - **Handlers**: built-in generators such as `make_reflect` (`handlers`)
//! - **Rewriting**: ordered, conflict-checked textual edits (`rewrite`)
//! - **Interpreter**: execution of `executeCode*` payloads (`interpreter`)
//! - **Pipeline**: one pass over one file (`pipeline`)
//!
//! # Example
//!
//! ```rust,ignore
//! use flexgen_engine::Pipeline;
//!
//! let source = r#"
//! struct __attribute__((annotate("{gen};{funccall};make_reflect"))) S {
//!     __attribute__((annotate("{gen};{attr};reflectable"))) int m_id;
//! };
//! "#;
//!
//! let report = Pipeline::default().process(source)?;
//! println!("{}", report.output);
//! ```

#![warn(rust_2018_idioms)]

pub mod annotation;
pub mod dispatch;
pub mod frontend;
pub mod handlers;
pub mod interpreter;
pub mod pipeline;
pub mod rewrite;

pub use annotation::{decode, decode_attributes, Command, CommandName, DecodeError, FlagSet};
pub use dispatch::{
    DispatchError, Handler, HandlerContext, HandlerError, HandlerRegistry, HandlerResult,
};
pub use frontend::{parse_source, DeclId, DeclKind, DeclRef, DeclTree, FrontendError, Span};
pub use handlers::MakeReflect;
pub use interpreter::{Interpreter, InterpreterError, ProcessInterpreter, SharedInterpreter};
pub use pipeline::{
    Diagnostic, FileReport, Pipeline, PipelineError, PipelineOptions, Severity,
};
pub use rewrite::{Placement, RewriteBuffer, RewriteError};
