//! `flexgen run`: process source files and write generated code back.

use std::path::PathBuf;

use flexgen_engine::pipeline::{Diagnostic, Location};
use flexgen_engine::{
    FileReport, HandlerRegistry, Pipeline, PipelineError, PipelineOptions, ProcessInterpreter,
    SharedInterpreter,
};
use serde::Serialize;
use termcolor::ColorChoice;

use super::files::{collect_source_files, FileFilter};
use super::pool::map_parallel;
use crate::config::Config;
use crate::diagnostic::{self, DiagnosticEmitter};
use crate::output::{plural, StyledOutput};

pub struct RunOptions {
    pub paths: Vec<PathBuf>,
    pub check: bool,
    pub stdout: bool,
    pub json: bool,
    pub jobs: Option<usize>,
    pub keep_going: bool,
    pub interpreter: Option<String>,
    pub interpreter_args: Vec<String>,
    pub config: Option<PathBuf>,
    pub color: ColorChoice,
}

/// Flags merged over the config file.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    jobs: usize,
    keep_going: bool,
    /// Interpreter program and its arguments
    interpreter: Option<(String, Vec<String>)>,
}

fn resolve_settings(options: &RunOptions, config: &Config) -> Settings {
    let jobs = options
        .jobs
        .or(config.run.jobs)
        .unwrap_or_else(num_cpus::get)
        .max(1);

    let interpreter = match (&options.interpreter, &config.interpreter) {
        (Some(program), _) => Some((program.clone(), options.interpreter_args.clone())),
        (None, Some(configured)) => {
            let args = if options.interpreter_args.is_empty() {
                configured.args.clone()
            } else {
                options.interpreter_args.clone()
            };
            Some((configured.program.clone(), args))
        }
        (None, None) => None,
    };

    Settings {
        jobs,
        keep_going: options.keep_going || config.run.keep_going,
        interpreter,
    }
}

fn build_pipeline(settings: &Settings) -> Pipeline {
    let mut pipeline = Pipeline::new(HandlerRegistry::with_builtin_handlers()).with_options(
        PipelineOptions {
            keep_going: settings.keep_going,
        },
    );
    if let Some((program, args)) = &settings.interpreter {
        tracing::debug!(program = %program, "using process interpreter");
        pipeline = pipeline.with_interpreter(SharedInterpreter::new(
            ProcessInterpreter::new(program.as_str()).args(args.iter().cloned()),
        ));
    }
    pipeline
}

enum Failure {
    Io(std::io::Error),
    Pipeline(PipelineError),
}

struct FileOutcome {
    path: PathBuf,
    source: String,
    result: Result<FileReport, Failure>,
}

impl FileOutcome {
    fn changed(&self) -> bool {
        matches!(&self.result, Ok(report) if report.changed)
    }
}

/// Read, process and (unless `dry_run`) write back one file.
fn process_path(pipeline: &Pipeline, path: PathBuf, dry_run: bool) -> FileOutcome {
    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            return FileOutcome {
                path,
                source: String::new(),
                result: Err(Failure::Io(e)),
            }
        }
    };

    let result = match pipeline.process_file(&path, &source) {
        Ok(report) if report.changed && !dry_run => match std::fs::write(&path, &report.output) {
            Ok(()) => Ok(report),
            Err(e) => Err(Failure::Io(e)),
        },
        Ok(report) => Ok(report),
        Err(e) => Err(Failure::Pipeline(e)),
    };
    if let Err(Failure::Pipeline(e)) = &result {
        tracing::debug!(path = %path.display(), "{}", e);
    }

    FileOutcome {
        path,
        source,
        result,
    }
}

pub fn execute(options: RunOptions) -> anyhow::Result<()> {
    // 1. Configuration
    let (config, config_path) = Config::load(options.config.as_deref())?;
    if let Some(path) = &config_path {
        tracing::info!(config = %path.display(), "using config");
    }
    let settings = resolve_settings(&options, &config);

    // 2. Collect source files
    let filter = FileFilter::new(config.run.extensions.clone(), config.exclude_patterns()?);
    let files = collect_source_files(&options.paths, &filter)?;
    if files.is_empty() {
        eprintln!("No source files found.");
        std::process::exit(1);
    }
    if options.stdout && files.len() != 1 {
        anyhow::bail!("--stdout needs exactly one file, found {}", files.len());
    }

    // 3. Process
    let pipeline = build_pipeline(&settings);
    let dry_run = options.check || options.stdout;
    let outcomes = map_parallel(files, settings.jobs, |path| {
        process_path(&pipeline, path, dry_run)
    });

    // 4. Report
    if options.json {
        emit_json(&outcomes)?;
    } else {
        emit_pretty(&outcomes, &options);
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let changed = outcomes.iter().filter(|o| o.changed()).count();
    if !options.json && !options.stdout {
        print_summary(&outcomes, changed, failed, &options);
    }

    // 5. Exit code
    if failed > 0 || (options.check && changed > 0) {
        std::process::exit(1);
    }
    Ok(())
}

// ── Pretty output (codespan bridge) ────────────────────────────────────────

fn emit_pretty(outcomes: &[FileOutcome], options: &RunOptions) {
    let mut emitter = DiagnosticEmitter::new(options.color);
    let mut out = StyledOutput::new(options.color);

    for outcome in outcomes {
        let name = outcome.path.display().to_string();
        match &outcome.result {
            Err(Failure::Io(e)) => eprintln!("error: {}: {}", name, e),
            Err(Failure::Pipeline(e)) => {
                let file_id = emitter.add_file(name, outcome.source.clone());
                emitter.emit(&diagnostic::from_pipeline_error(file_id, e));
            }
            Ok(report) => {
                if !report.diagnostics.is_empty() {
                    let file_id = emitter.add_file(name.clone(), outcome.source.clone());
                    for d in &report.diagnostics {
                        emitter.emit(&diagnostic::from_report(file_id, d));
                    }
                }
                if options.stdout {
                    out.plain(&report.output);
                } else if report.changed {
                    let verb = if options.check { "would rewrite" } else { "rewrote" };
                    out.info(&format!("{} ", verb));
                    out.plain(&name);
                    out.newline();
                }
            }
        }
    }
    out.flush();
}

fn print_summary(outcomes: &[FileOutcome], changed: usize, failed: usize, options: &RunOptions) {
    let mut out = StyledOutput::new(options.color);
    let warnings: usize = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .map(|r| r.warnings().count())
        .sum();

    out.plain(&format!(
        "Processed {} file{}: ",
        outcomes.len(),
        plural(outcomes.len())
    ));
    let changed_text = format!(
        "{} {}",
        changed,
        if options.check { "to rewrite" } else { "rewritten" }
    );
    if changed > 0 {
        out.success(&changed_text);
    } else {
        out.plain(&changed_text);
    }
    if failed > 0 {
        out.plain(", ");
        out.error(&format!("{} failed", failed));
    }
    if warnings > 0 {
        out.plain(", ");
        out.warning(&format!("{} warning{}", warnings, plural(warnings)));
    }
    out.plain(".");
    out.newline();
    out.flush();
}

// ── JSON output ────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Changed,
    Unchanged,
    Failed,
}

#[derive(Serialize)]
struct JsonError {
    code: Option<&'static str>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: String,
    status: Status,
    edits: usize,
    diagnostics: &'a [Diagnostic],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
}

impl<'a> JsonFile<'a> {
    fn from_outcome(outcome: &'a FileOutcome) -> Self {
        let path = outcome.path.display().to_string();
        match &outcome.result {
            Ok(report) => Self {
                path,
                status: if report.changed {
                    Status::Changed
                } else {
                    Status::Unchanged
                },
                edits: report.edits,
                diagnostics: &report.diagnostics,
                error: None,
            },
            Err(failure) => Self {
                path,
                status: Status::Failed,
                edits: 0,
                diagnostics: &[],
                error: Some(json_error(failure)),
            },
        }
    }
}

fn json_error(failure: &Failure) -> JsonError {
    match failure {
        Failure::Io(e) => JsonError {
            code: None,
            message: e.to_string(),
            location: None,
        },
        Failure::Pipeline(e) => JsonError {
            code: Some(e.code()),
            message: e.to_string(),
            location: e.span().map(Location::from),
        },
    }
}

fn emit_json(outcomes: &[FileOutcome]) -> anyhow::Result<()> {
    let files: Vec<JsonFile<'_>> = outcomes.iter().map(JsonFile::from_outcome).collect();
    println!("{}", serde_json::to_string_pretty(&files)?);
    Ok(())
}
