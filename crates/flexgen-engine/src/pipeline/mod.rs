//! The annotation pipeline.
//!
//! One pass over one file: scan the declarations, decode every marker,
//! dispatch the commands, queue the results in a [`RewriteBuffer`] and apply
//! it. A file either produces its complete output or fails with a
//! [`PipelineError`]; nothing is partially applied.

mod dispatcher;
mod error;
mod report;

pub use dispatcher::Dispatcher;
pub use error::PipelineError;
pub use report::{
    Diagnostic, FileReport, Location, Severity, MALFORMED_MARKER, UNKNOWN_COMMAND,
};

use crate::annotation::{decode, decode_attributes};
use crate::dispatch::{HandlerContext, HandlerRegistry, HandlerResult, MemberFlags};
use crate::frontend::{parse_source, DeclRef, DeclTree};
use crate::interpreter::SharedInterpreter;
use crate::rewrite::{Placement, RewriteBuffer};
use std::path::Path;

/// Knobs for a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Report handler and interpreter failures as diagnostics and skip the
    /// declaration instead of failing the file
    pub keep_going: bool,
}

/// Registry, interpreter and options shared by every file of a run.
#[derive(Debug)]
pub struct Pipeline {
    registry: HandlerRegistry,
    interpreter: Option<SharedInterpreter>,
    options: PipelineOptions,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(HandlerRegistry::with_builtin_handlers())
    }
}

impl Pipeline {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry,
            interpreter: None,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_interpreter(mut self, interpreter: SharedInterpreter) -> Self {
        self.interpreter = Some(interpreter);
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Process source text that did not come from a file.
    pub fn process(&self, source: &str) -> Result<FileReport, PipelineError> {
        self.run(None, source)
    }

    /// Process the contents of `path`. The path is only used for reports
    /// and handler context; nothing is read or written here.
    pub fn process_file(&self, path: &Path, source: &str) -> Result<FileReport, PipelineError> {
        self.run(Some(path), source)
    }

    fn run(&self, path: Option<&Path>, source: &str) -> Result<FileReport, PipelineError> {
        let tree = parse_source(source)?;
        let flags = classify_members(&tree);
        let dispatcher = Dispatcher::new(&self.registry, self.interpreter.as_ref());

        let mut buffer = RewriteBuffer::new(source);
        let mut diagnostics = Vec::new();

        for id in tree.preorder() {
            let decl = tree.node(id);
            for marker in decl.annotations() {
                let command = match decode(&marker.text) {
                    Ok(command) => command,
                    Err(err) if err.is_silent() => continue,
                    Err(err) => {
                        tracing::warn!(decl = %decl.describe(), marker = %marker.text, "{}", err);
                        diagnostics.push(Diagnostic::from_decode_error(
                            &err,
                            &marker.text,
                            marker.span,
                        ));
                        continue;
                    }
                };
                tracing::trace!(
                    decl = %decl.describe(),
                    command = command.kind(),
                    "decoded marker"
                );

                let ctx = HandlerContext::new(decl, source, &flags)
                    .with_interpreter(self.interpreter.as_ref())
                    .with_path(path);
                match dispatcher.dispatch(&ctx, marker, &command) {
                    Ok(result) => commit(&mut buffer, decl, result),
                    Err(err) if self.options.keep_going && err.is_recoverable() => {
                        tracing::warn!("{}", err);
                        diagnostics.push(Diagnostic::from_error(&err));
                    }
                    Err(err) => return Err(err),
                }
            }
        }

        let output = buffer.apply()?;
        let changed = output != source;
        tracing::debug!(
            path = ?path,
            edits = buffer.len(),
            changed,
            "applied edits"
        );
        Ok(FileReport {
            path: path.map(Path::to_path_buf),
            output,
            changed,
            edits: buffer.len(),
            diagnostics,
        })
    }
}

/// `attr` flags of every declaration that has any.
fn classify_members(tree: &DeclTree) -> MemberFlags {
    tree.preorder()
        .into_iter()
        .filter_map(|id| {
            let node = tree.node(id);
            let flags = decode_attributes(node.annotations().iter().map(|a| a.text.as_str()));
            (!flags.is_empty()).then_some((id, flags))
        })
        .collect()
}

fn commit(buffer: &mut RewriteBuffer<'_>, decl: DeclRef<'_>, result: HandlerResult) {
    match result {
        HandlerResult::NoEffect => {}
        HandlerResult::Replace(text) => {
            let span = decl.span();
            buffer.replace(span.start..span.end, text);
        }
        HandlerResult::Insert {
            anchor,
            text,
            placement,
        } => buffer.insert(anchor, text, placement == Placement::After),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{HandlerError, HandlerResult};

    #[test]
    fn test_unannotated_source_unchanged() {
        let source = "namespace n { struct S { int a; void f(); }; }\n";
        let report = Pipeline::default().process(source).unwrap();
        assert_eq!(report.output, source);
        assert!(!report.changed);
        assert_eq!(report.edits, 0);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_foreign_annotations_are_silent() {
        let source = r#"struct __attribute__((annotate("other tool"))) S { int a; };"#;
        let report = Pipeline::default().process(source).unwrap();
        assert!(!report.changed);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_bad_gen_markers_warn() {
        let source = r#"
struct __attribute__((annotate("{gen};{nope};x"))) A {};
struct __attribute__((annotate("{gen};{attr"))) B {};
"#;
        let report = Pipeline::default().process(source).unwrap();
        let codes: Vec<_> = report.warnings().map(|d| d.code).collect();
        assert_eq!(codes, vec![UNKNOWN_COMMAND, MALFORMED_MARKER]);
        assert!(!report.changed);
    }

    #[test]
    fn test_handler_on_non_record_declaration() {
        let mut registry = HandlerRegistry::new();
        registry
            .register(
                "rename",
                |ctx: &HandlerContext<'_>| -> Result<HandlerResult, HandlerError> {
                    Ok(HandlerResult::Replace(format!("int {}_renamed;", ctx.decl().name())))
                },
            )
            .unwrap();
        let source = r#"__attribute__((annotate("{gen};{funccall};rename"))) int x;"#;
        let report = Pipeline::new(registry).process(source).unwrap();
        assert_eq!(report.output, "int x_renamed;");
    }

    #[test]
    fn test_handler_sees_member_flags() {
        let mut registry = HandlerRegistry::new();
        registry
            .register(
                "count",
                |ctx: &HandlerContext<'_>| -> Result<HandlerResult, HandlerError> {
                    let flagged = ctx
                        .decl()
                        .members()
                        .filter(|m| ctx.has_flag(m.id(), "tagged"))
                        .count();
                    Ok(HandlerResult::Insert {
                        anchor: ctx.decl().span().end,
                        text: format!(" // {}", flagged),
                        placement: Placement::After,
                    })
                },
            )
            .unwrap();
        let source = r#"struct __attribute__((annotate("{gen};{funccall};count"))) S {
  __attribute__((annotate("{gen};{attr};tagged"))) int a;
  __attribute__((annotate("{gen};{attr};x;tagged"))) int b;
  int c;
};"#;
        let report = Pipeline::new(registry).process(source).unwrap();
        assert!(report.output.ends_with("}; // 2"));
    }
}
