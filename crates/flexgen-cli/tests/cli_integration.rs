//! Integration tests for the `flexgen` binary.
//!
//! Each test works in its own temporary directory and runs the built binary.

use std::path::Path;
use std::process::{Command, Output};

const HEADER: &str = r#"#pragma once
#include <string>
#include <vector>

struct
  $apply(
    make_reflect
  )
SomeStructName {
 private:
  const int m_bar2 = 2;

  __attribute__((annotate("{gen};{attr};reflectable;")))
  std::vector<std::string> m_VecStr2;
};
"#;

fn flexgen(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flexgen"))
        .args(args)
        .current_dir(dir)
        .env_remove("FLEXGEN_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run flexgen")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ────────────────────────────────────────────────────────────────────────────
// run
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_run_rewrites_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let header = dir.path().join("some.h");
    std::fs::write(&header, HEADER).unwrap();

    let output = flexgen(dir.path(), &["run"]);
    assert!(output.status.success(), "{:?}", output);
    assert!(stdout(&output).contains("Processed 1 file: 1 rewritten"));

    let rewritten = std::fs::read_to_string(&header).unwrap();
    assert!(rewritten.contains("      { \"m_VecStr2\", \"std::vector<std::string>\" }\n"));
    assert!(!rewritten.contains("\"m_bar2\""));

    // Second run is a no-op
    let output = flexgen(dir.path(), &["run", "--check"]);
    assert!(output.status.success(), "{:?}", output);
    assert_eq!(std::fs::read_to_string(&header).unwrap(), rewritten);
}

#[test]
fn test_check_reports_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let header = dir.path().join("some.h");
    std::fs::write(&header, HEADER).unwrap();

    let output = flexgen(dir.path(), &["run", "--check", "."]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("would rewrite"));
    assert_eq!(std::fs::read_to_string(&header).unwrap(), HEADER);
}

#[test]
fn test_stdout_prints_single_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("some.h"), HEADER).unwrap();

    let output = flexgen(dir.path(), &["run", "--stdout", "some.h"]);
    assert!(output.status.success(), "{:?}", output);
    assert!(stdout(&output).contains("static std::map<std::string, std::string> methods = {"));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("some.h")).unwrap(),
        HEADER
    );
}

#[test]
fn test_json_report_and_failure_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.h"), HEADER).unwrap();
    std::fs::write(dir.path().join("b.h"), "struct $apply(unknown) B {};\n").unwrap();

    let output = flexgen(dir.path(), &["run", "--format", "json", "--jobs", "2"]);
    assert_eq!(output.status.code(), Some(1));

    let files: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let files = files.as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["status"], "changed");
    assert_eq!(files[0]["edits"], 1);
    assert_eq!(files[1]["status"], "failed");
    assert_eq!(files[1]["error"]["code"], "G0002");
}

#[test]
fn test_config_file_excludes_and_extensions() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("flexgen.toml"),
        "[run]\nextensions = [\"hpp\"]\nexclude = [\"generated/*\"]\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("skip.h"), HEADER).unwrap();
    std::fs::write(dir.path().join("keep.hpp"), HEADER).unwrap();
    std::fs::create_dir_all(dir.path().join("generated")).unwrap();
    std::fs::write(dir.path().join("generated/out.hpp"), HEADER).unwrap();

    let output = flexgen(dir.path(), &["run"]);
    assert!(output.status.success(), "{:?}", output);
    assert_ne!(std::fs::read_to_string(dir.path().join("keep.hpp")).unwrap(), HEADER);
    assert_eq!(std::fs::read_to_string(dir.path().join("skip.h")).unwrap(), HEADER);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("generated/out.hpp")).unwrap(),
        HEADER
    );
}

#[cfg(unix)]
#[test]
fn test_interpreter_flag() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("gen.h"),
        "$executeCodeAndReplace(int generated;) int placeholder;\n",
    )
    .unwrap();

    let output = flexgen(
        dir.path(),
        &["run", "--interpreter", "sh", "--interpreter-arg", "-c", "--interpreter-arg", "cat"],
    );
    assert!(output.status.success(), "{:?}", output);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("gen.h")).unwrap(),
        "int generated;\n"
    );
}

#[cfg(unix)]
#[test]
fn test_failed_apply_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let header = dir.path().join("conflict.h");
    // The reflection tables land inside the record the execute marker replaces
    let source = "struct $apply(make_reflect) $executeCodeAndReplace(int gone;) S {\n  \
                  __attribute__((annotate(\"{gen};{attr};reflectable\"))) int a;\n};\n";
    std::fs::write(&header, source).unwrap();

    let output = flexgen(
        dir.path(),
        &[
            "run",
            "--format",
            "json",
            "--interpreter",
            "sh",
            "--interpreter-arg",
            "-c",
            "--interpreter-arg",
            "cat",
        ],
    );
    assert_eq!(output.status.code(), Some(1));

    let files: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(files[0]["status"], "failed");
    assert_eq!(files[0]["error"]["code"], "G0006");
    assert_eq!(std::fs::read_to_string(&header).unwrap(), source);
}

// ────────────────────────────────────────────────────────────────────────────
// decode / handlers
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_decode_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = flexgen(dir.path(), &["decode", "{gen};{executeCode};\"puts(1);\""]);
    assert!(output.status.success(), "{:?}", output);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["command"], "execute_code");
    assert_eq!(value["payload"], "puts(1);");

    let output = flexgen(dir.path(), &["decode", "{gen};{bogus};x"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown command name 'bogus'"));
}

#[test]
fn test_handlers_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = flexgen(dir.path(), &["handlers"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("make_reflect"));
}
