//! End-to-end tests for the annotation pipeline
//!
//! Tests cover:
//! - Reflection tables for annotated records
//! - Idempotence when re-running on generated output
//! - Dispatch failures and `keep_going`
//! - Conflicting edits

use flexgen_engine::{
    DispatchError, HandlerContext, HandlerError, HandlerRegistry, HandlerResult, Pipeline,
    PipelineError, PipelineOptions, RewriteError, Severity,
};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

const SOME_STRUCT: &str = r#"#include <string>
#include <vector>

struct
  $apply(
    make_reflect
  )
SomeStructName {
 public:
  SomeStructName() {
    // ...
  }
 private:
  //__attribute__((annotate("{gen};{attr};reflectable;")))
  const int m_bar2 = 2;

  __attribute__((annotate("{gen};{attr};reflectable;")))
  std::vector<std::string> m_VecStr2;
};

int main(int argc, char** argv) {
  return 0;
}
"#;

fn tables(fields: &[(&str, &str)], methods: &[(&str, &str)]) -> String {
    let mut out = String::from("\n  public:\n    static std::map<std::string, std::string> fields = {\n");
    for (k, v) in fields {
        out.push_str(&format!("      {{ \"{}\", \"{}\" }}\n", k, v));
    }
    out.push_str("    };\n\n    static std::map<std::string, std::string> methods = {\n");
    for (k, v) in methods {
        out.push_str(&format!("      {{ \"{}\", \"{}\" }}\n", k, v));
    }
    out.push_str("    };\n");
    out
}

/// Expected output: `text` inserted right before the first `};` at column 0.
fn insert_before_record_close(source: &str, text: &str) -> String {
    let close = source.find("\n};").unwrap() + 1;
    format!("{}{}{}", &source[..close], text, &source[close..])
}

fn failing(_: &HandlerContext<'_>) -> Result<HandlerResult, HandlerError> {
    Err("handler exploded".into())
}

fn erase(_: &HandlerContext<'_>) -> Result<HandlerResult, HandlerError> {
    Ok(HandlerResult::Replace(String::new()))
}

// =============================================================================
// REFLECTION
// =============================================================================

#[test]
fn test_reflect_end_to_end() {
    let report = Pipeline::default().process(SOME_STRUCT).unwrap();
    let expected = insert_before_record_close(
        SOME_STRUCT,
        &tables(&[("m_VecStr2", "std::vector<std::string>")], &[]),
    );
    assert_eq!(report.output, expected);
    assert!(report.changed);
    assert_eq!(report.edits, 1);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_reflect_is_idempotent() {
    let pipeline = Pipeline::default();
    let first = pipeline.process(SOME_STRUCT).unwrap();
    let second = pipeline.process(&first.output).unwrap();
    assert_eq!(first.output, second.output);
    assert!(!second.changed);
}

#[test]
fn test_reflect_orders_keys() {
    let source = r#"struct $apply(make_reflect) S {
  [[clang::annotate("{gen};{attr};reflectable")]] int b;
  [[clang::annotate("{gen};{attr};reflectable")]] double a;
  [[clang::annotate("{gen};{attr};reflectable")]] char c;
};
"#;
    let report = Pipeline::default().process(source).unwrap();
    let expected = insert_before_record_close(
        source,
        &tables(&[("a", "double"), ("b", "int"), ("c", "char")], &[]),
    );
    assert_eq!(report.output, expected);
}

#[test]
fn test_reflect_methods_and_fields() {
    let source = r#"class $apply(make_reflect) Widget {
 public:
  $executeCodeLine() Widget();
  __attribute__((annotate("{gen};{attr};reflectable"))) virtual ~Widget();
  __attribute__((annotate("{gen};{attr};reflectable"))) const std::string& name() const;
  __attribute__((annotate("{gen};{attr};reflectable"))) int size() const { return 0; }
 private:
  __attribute__((annotate("{gen};{attr};reflectable"))) volatile unsigned int m_count;
};
"#;
    let registry = HandlerRegistry::with_builtin_handlers();
    let interpreter = flexgen_engine::SharedInterpreter::new(
        |_: &str| -> Result<Option<String>, flexgen_engine::InterpreterError> { Ok(None) },
    );
    let report = Pipeline::new(registry)
        .with_interpreter(interpreter)
        .process(source)
        .unwrap();
    assert!(report.output.contains("      { \"m_count\", \"unsigned int\" }\n"));
    assert!(report.output.contains("      { \"name\", \"const std::string&\" }\n"));
    assert!(report.output.contains("      { \"size\", \"int\" }\n"));
    assert!(report.output.contains("      { \"~Widget\", \"void\" }\n"));
    // The executeCodeLine marker erased the constructor declaration
    assert!(!report.output.contains("Widget();"));
}

#[test]
fn test_reflect_nested_records() {
    let source = r#"namespace outer {
struct $apply(make_reflect) Outer {
  struct $apply(make_reflect) Inner {
    __attribute__((annotate("{gen};{attr};reflectable"))) int x;
  };
};
}
"#;
    let report = Pipeline::default().process(source).unwrap();
    assert_eq!(report.edits, 2);
    assert_eq!(report.output.matches("fields = {").count(), 2);
    assert!(report.output.contains("{ \"x\", \"int\" }"));
}

#[test]
fn test_reflect_after_unterminated_macro_lines() {
    let source = r#"class $apply(make_reflect) Widget {
  Q_OBJECT
  Q_PROPERTY(int x READ x)
 public:
  __attribute__((annotate("{gen};{attr};reflectable"))) int x;
};
"#;
    let report = Pipeline::default().process(source).unwrap();
    assert!(report.output.contains("      { \"x\", \"int\" }\n"));
}

#[test]
fn test_reflect_every_declarator() {
    let source = r#"struct $apply(make_reflect) S {
  __attribute__((annotate("{gen};{attr};reflectable"))) int a, *b;
};
"#;
    let report = Pipeline::default().process(source).unwrap();
    let expected = insert_before_record_close(
        source,
        &tables(&[("a", "int"), ("b", "int*")], &[]),
    );
    assert_eq!(report.output, expected);
}

#[test]
fn test_disabled_conditional_arm_ignored() {
    let source = r#"struct $apply(make_reflect) S {
#if 0
  int broken(;
#else
  __attribute__((annotate("{gen};{attr};reflectable"))) int live;
#endif
};
"#;
    let report = Pipeline::default().process(source).unwrap();
    assert!(report.output.contains("{ \"live\", \"int\" }"));
    assert!(!report.output.contains("broken\""));
}

// =============================================================================
// DISPATCH FAILURES
// =============================================================================

#[test]
fn test_unregistered_handler_fails_file() {
    let source = "struct $apply(does_not_exist) S { int a; };";
    let pipeline = Pipeline::default().with_options(PipelineOptions { keep_going: true });
    match pipeline.process(source) {
        Err(PipelineError::Dispatch {
            decl,
            marker,
            source: DispatchError::UnregisteredHandler { name },
            ..
        }) => {
            assert_eq!(decl, "struct S");
            assert_eq!(marker, "{gen};{funccall};does_not_exist");
            assert_eq!(name, "does_not_exist");
        }
        other => panic!("expected dispatch error, got {:?}", other),
    }
}

#[test]
fn test_handler_failure_aborts_by_default() {
    let mut registry = HandlerRegistry::with_builtin_handlers();
    registry.register("explode", failing).unwrap();
    let source = "struct $apply(explode) S { int a; };";
    let err = Pipeline::new(registry).process(source).unwrap_err();
    assert_eq!(err.code(), "G0003");
    assert!(err.to_string().contains("handler exploded"));
}

#[test]
fn test_keep_going_reports_handler_failure() {
    let mut registry = HandlerRegistry::with_builtin_handlers();
    registry.register("explode", failing).unwrap();
    let source = "struct $apply(explode) A { int a; };\nstruct $apply(make_reflect) B { int b; };\n";
    let report = Pipeline::new(registry)
        .with_options(PipelineOptions { keep_going: true })
        .process(source)
        .unwrap();

    let errors: Vec<_> = report.errors().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].severity, Severity::Error);
    assert_eq!(errors[0].code, "G0003");
    assert_eq!(errors[0].location.map(|l| l.line), Some(1));
    // B is still processed
    assert!(report.output.contains("static std::map<std::string, std::string> fields"));
}

#[test]
fn test_overlapping_edits_fail_file() {
    let mut registry = HandlerRegistry::with_builtin_handlers();
    registry.register("erase", erase).unwrap();
    let source = "struct $apply(make_reflect) $apply(erase) S { int a; };";
    let err = Pipeline::new(registry)
        .with_options(PipelineOptions { keep_going: true })
        .process(source)
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Rewrite(RewriteError::Overlapping { .. })
    ));
}

#[test]
fn test_frontend_error_fails_file() {
    let err = Pipeline::default().process("struct S { int a;").unwrap_err();
    assert_eq!(err.code(), "G0001");
    assert!(err.span().is_some());
}
