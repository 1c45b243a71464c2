//! Rendering of pipeline errors and report diagnostics with codespan.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};
use flexgen_engine::pipeline::{Diagnostic as ReportDiagnostic, Severity};
use flexgen_engine::{DispatchError, PipelineError};

/// Codespan diagnostic for an error that stopped a file.
pub fn from_pipeline_error(file_id: usize, err: &PipelineError) -> Diagnostic<usize> {
    let diag = Diagnostic::error().with_code(err.code());

    match err {
        PipelineError::Frontend(frontend) => {
            let labels = frontend
                .messages()
                .into_iter()
                .map(|(span, message)| {
                    Label::primary(file_id, span.start..span.end).with_message(message)
                })
                .collect();
            diag.with_message(frontend.to_string()).with_labels(labels)
        }
        PipelineError::Dispatch {
            source: DispatchError::UnregisteredHandler { name },
            ..
        } => with_label(diag.with_message(err.to_string()), file_id, err, "annotated here")
            .with_notes(vec![format!(
                "help: register a handler named '{}' or fix the marker",
                name
            )]),
        PipelineError::InterpreterUnavailable { .. } => {
            with_label(diag.with_message(err.to_string()), file_id, err, "annotated here")
                .with_notes(vec![
                    "help: pass --interpreter or set [interpreter] in flexgen.toml".to_string(),
                ])
        }
        _ => with_label(diag.with_message(err.to_string()), file_id, err, ""),
    }
}

fn with_label(
    diag: Diagnostic<usize>,
    file_id: usize,
    err: &PipelineError,
    message: &str,
) -> Diagnostic<usize> {
    match err.byte_range() {
        Some(range) => diag.with_labels(vec![Label::primary(file_id, range).with_message(message)]),
        None => diag,
    }
}

/// Codespan diagnostic for a warning or recovered error in a report.
pub fn from_report(file_id: usize, d: &ReportDiagnostic) -> Diagnostic<usize> {
    let diag = match d.severity {
        Severity::Error => Diagnostic::error(),
        Severity::Warning => Diagnostic::warning(),
    };
    let diag = diag.with_code(d.code).with_message(&d.message);
    match d.location {
        Some(location) => {
            diag.with_labels(vec![Label::primary(file_id, location.start..location.end)])
        }
        None => diag,
    }
}

/// Writes diagnostics for many files to stderr.
pub struct DiagnosticEmitter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticEmitter {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(choice),
            config: term::Config::default(),
        }
    }

    /// Register a file's source; returns its id.
    pub fn add_file(&mut self, name: String, source: String) -> usize {
        self.files.add(name, source)
    }

    pub fn emit(&mut self, diagnostic: &Diagnostic<usize>) {
        let mut writer = self.writer.lock();
        emit_to(&mut writer, &self.config, &self.files, diagnostic);
    }
}

fn emit_to(
    writer: &mut dyn WriteColor,
    config: &term::Config,
    files: &SimpleFiles<String, String>,
    diagnostic: &Diagnostic<usize>,
) {
    if let Err(e) = term::emit(writer, config, files, diagnostic) {
        tracing::warn!("failed to render diagnostic: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::diagnostic::Severity as CsSeverity;
    use codespan_reporting::term::termcolor::NoColor;
    use flexgen_engine::Pipeline;

    fn render(source: &str, diagnostic: &Diagnostic<usize>) -> String {
        let mut files = SimpleFiles::new();
        files.add("test.h".to_string(), source.to_string());
        let mut writer = NoColor::new(Vec::new());
        emit_to(&mut writer, &term::Config::default(), &files, diagnostic);
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_unregistered_handler_diagnostic() {
        let source = "struct $apply(nope) S { int a; };";
        let err = Pipeline::default().process(source).unwrap_err();
        let diag = from_pipeline_error(0, &err);

        assert_eq!(diag.severity, CsSeverity::Error);
        assert_eq!(diag.code.as_deref(), Some("G0002"));
        assert_eq!(diag.labels.len(), 1);
        assert_eq!(diag.labels[0].range, 0..source.len());

        let text = render(source, &diag);
        assert!(text.contains("error[G0002]"));
        assert!(text.contains("test.h:1:1"));
        assert!(text.contains("register a handler named 'nope'"));
    }

    #[test]
    fn test_frontend_error_labels_every_message() {
        let source = "struct S { int a;";
        let err = Pipeline::default().process(source).unwrap_err();
        let diag = from_pipeline_error(0, &err);
        assert_eq!(diag.code.as_deref(), Some("G0001"));
        assert!(!diag.labels.is_empty());
    }

    #[test]
    fn test_report_warning() {
        let source = r#"struct __attribute__((annotate("{gen};{bogus};"))) S {};"#;
        let report = Pipeline::default().process(source).unwrap();
        let warning = report.warnings().next().unwrap();
        let diag = from_report(0, warning);
        assert_eq!(diag.severity, CsSeverity::Warning);
        assert_eq!(diag.code.as_deref(), Some("W0001"));
        assert!(render(source, &diag).contains("warning[W0001]"));
    }
}
