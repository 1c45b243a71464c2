//! Interpreter backed by an external program.

use super::{Interpreter, InterpreterError};
use std::io::Write;
use std::process::{Command, Stdio};

/// Runs a program once per payload: the code goes to its stdin and its
/// stdout is the result. Empty stdout means no result; a non-zero exit
/// status is an error carrying stderr.
#[derive(Debug, Clone)]
pub struct ProcessInterpreter {
    program: String,
    args: Vec<String>,
}

impl ProcessInterpreter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Interpreter for ProcessInterpreter {
    fn execute(&mut self, code: &str) -> Result<Option<String>, InterpreterError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| InterpreterError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin from another thread so a chatty child cannot block on a
        // full stdout pipe while we are still writing.
        let stdin = child.stdin.take();
        let output = std::thread::scope(|scope| {
            let writer = scope.spawn(move || -> std::io::Result<()> {
                if let Some(mut stdin) = stdin {
                    stdin.write_all(code.as_bytes())?;
                }
                Ok(())
            });
            let output = child.wait_with_output();
            let written = writer.join().unwrap_or_else(|_| {
                Err(std::io::Error::other("stdin writer panicked"))
            });
            (output, written)
        });
        let (output, written) = output;
        let output = output?;

        if !output.status.success() {
            return Err(InterpreterError::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        // A child that exits without reading all of stdin is fine.
        if let Err(err) = written {
            if err.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(err.into());
            }
        }

        let stdout = String::from_utf8(output.stdout)?;
        tracing::trace!(program = %self.program, bytes = stdout.len(), "interpreter finished");
        Ok((!stdout.is_empty()).then_some(stdout))
    }
}
