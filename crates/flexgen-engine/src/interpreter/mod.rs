//! Code execution for `executeCode*` markers.
//!
//! An [`Interpreter`] takes a code payload and optionally returns text. The
//! pipeline reaches it through a [`SharedInterpreter`], a cloneable handle
//! around one interpreter behind a mutex: every execution holds the lock for
//! its whole duration, so interpreter calls are serialized across workers.

mod process;

pub use process::ProcessInterpreter;

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("failed to start interpreter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("interpreter I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("interpreter exited with {}: {stderr}", exit_description(.status))]
    Failed { status: Option<i32>, stderr: String },

    #[error("interpreter output is not valid UTF-8")]
    InvalidOutput(#[from] std::string::FromUtf8Error),

    #[error("{0}")]
    Rejected(String),
}

fn exit_description(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Executes code payloads.
pub trait Interpreter: Send {
    /// Run `code`. `Ok(None)` means the code ran and produced no text.
    fn execute(&mut self, code: &str) -> Result<Option<String>, InterpreterError>;
}

impl<F> Interpreter for F
where
    F: FnMut(&str) -> Result<Option<String>, InterpreterError> + Send,
{
    fn execute(&mut self, code: &str) -> Result<Option<String>, InterpreterError> {
        self(code)
    }
}

/// Cloneable, exclusively locked handle to one interpreter.
#[derive(Clone)]
pub struct SharedInterpreter {
    inner: Arc<Mutex<Box<dyn Interpreter>>>,
}

impl SharedInterpreter {
    pub fn new(interpreter: impl Interpreter + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(interpreter))),
        }
    }

    /// Run `code` while holding the interpreter lock.
    pub fn execute(&self, code: &str) -> Result<Option<String>, InterpreterError> {
        let mut interpreter = self.inner.lock();
        tracing::debug!(bytes = code.len(), "executing code payload");
        interpreter.execute(code)
    }
}

impl fmt::Debug for SharedInterpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedInterpreter")
            .field("locked", &self.inner.is_locked())
            .finish()
    }
}
