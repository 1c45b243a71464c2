//! Routes one decoded command to its handler or the interpreter.

use super::error::PipelineError;
use crate::annotation::Command;
use crate::dispatch::{HandlerContext, HandlerRegistry, HandlerResult};
use crate::frontend::Annotation;
use crate::interpreter::SharedInterpreter;

pub struct Dispatcher<'p> {
    registry: &'p HandlerRegistry,
    interpreter: Option<&'p SharedInterpreter>,
}

impl<'p> Dispatcher<'p> {
    pub fn new(registry: &'p HandlerRegistry, interpreter: Option<&'p SharedInterpreter>) -> Self {
        Self {
            registry,
            interpreter,
        }
    }

    /// Run `command`, decoded from `marker`, against the context declaration.
    pub fn dispatch(
        &self,
        ctx: &HandlerContext<'_>,
        marker: &Annotation,
        command: &Command,
    ) -> Result<HandlerResult, PipelineError> {
        let decl = ctx.decl();
        match command {
            Command::Attribute(_) => Ok(HandlerResult::NoEffect),
            Command::FunctionCall(name) => {
                let handler = self
                    .registry
                    .resolve(name)
                    .map_err(|source| PipelineError::Dispatch {
                        decl: decl.describe(),
                        span: decl.span(),
                        marker: marker.text.clone(),
                        source,
                    })?;
                tracing::debug!(handler = %name, decl = %decl.describe(), "dispatching");
                handler.run(ctx).map_err(|source| PipelineError::Handler {
                    handler: name.clone(),
                    decl: decl.describe(),
                    span: decl.span(),
                    source,
                })
            }
            Command::ExecuteCode(code) => {
                self.execute(ctx, marker, code)?;
                Ok(HandlerResult::Replace(String::new()))
            }
            Command::ExecuteAndReplace(code) => {
                let result = self.execute(ctx, marker, code)?;
                Ok(HandlerResult::Replace(result.unwrap_or_default()))
            }
        }
    }

    fn execute(
        &self,
        ctx: &HandlerContext<'_>,
        marker: &Annotation,
        code: &str,
    ) -> Result<Option<String>, PipelineError> {
        let decl = ctx.decl();
        let interpreter = self
            .interpreter
            .ok_or_else(|| PipelineError::InterpreterUnavailable {
                decl: decl.describe(),
                span: decl.span(),
                marker: marker.text.clone(),
            })?;
        interpreter
            .execute(code)
            .map_err(|source| PipelineError::Interpreter {
                decl: decl.describe(),
                span: decl.span(),
                source,
            })
    }
}
