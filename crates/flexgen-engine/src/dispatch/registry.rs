//! Handler registry: command name to handler.

use super::handler::Handler;
use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("no handler named '{name}' is registered")]
    UnregisteredHandler { name: String },

    #[error("a handler named '{name}' is already registered")]
    DuplicateHandler { name: String },
}

/// Handlers by name. Populated once at startup, then shared read-only.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: FxHashMap<String, Box<dyn Handler>>,
}

impl HandlerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in handlers.
    pub fn with_builtin_handlers() -> Self {
        let mut registry = Self::new();
        for (name, handler) in crate::handlers::builtin_handlers() {
            let registered = registry.insert(name.to_string(), handler);
            debug_assert!(registered.is_ok(), "built-in handler '{}' listed twice", name);
        }
        registry
    }

    /// Register `handler` under `name`. An existing registration is never
    /// replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl Handler + 'static,
    ) -> Result<(), DispatchError> {
        self.insert(name.into(), Box::new(handler))
    }

    fn insert(&mut self, name: String, handler: Box<dyn Handler>) -> Result<(), DispatchError> {
        if self.handlers.contains_key(&name) {
            return Err(DispatchError::DuplicateHandler { name });
        }
        tracing::debug!(handler = %name, "registered handler");
        self.handlers.insert(name, handler);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Handler> {
        self.handlers.get(name).map(|h| h.as_ref())
    }

    /// Look up `name`, failing with [`DispatchError::UnregisteredHandler`].
    pub fn resolve(&self, name: &str) -> Result<&dyn Handler, DispatchError> {
        self.get(name).ok_or_else(|| DispatchError::UnregisteredHandler {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// `(name, description)` pairs sorted by name.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .handlers
            .iter()
            .map(|(name, handler)| (name.as_str(), handler.description()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.entries().into_iter().map(|(name, _)| name).collect();
        f.debug_struct("HandlerRegistry").field("handlers", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{HandlerContext, HandlerError, HandlerResult};

    fn no_effect(_: &HandlerContext<'_>) -> Result<HandlerResult, HandlerError> {
        Ok(HandlerResult::NoEffect)
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = HandlerRegistry::new();
        registry.register("noop", no_effect).unwrap();
        assert!(registry.contains("noop"));
        assert!(registry.resolve("noop").is_ok());
        assert_eq!(
            registry.resolve("missing").err(),
            Some(DispatchError::UnregisteredHandler {
                name: "missing".into()
            })
        );
    }

    #[test]
    fn test_duplicate_registration_keeps_first() {
        let mut registry = HandlerRegistry::with_builtin_handlers();
        let before = registry.get("make_reflect").map(|h| h.description().to_string());

        let err = registry.register("make_reflect", no_effect).unwrap_err();
        assert_eq!(
            err,
            DispatchError::DuplicateHandler {
                name: "make_reflect".into()
            }
        );
        let after = registry.get("make_reflect").map(|h| h.description().to_string());
        assert_eq!(before, after);
        assert!(before.is_some_and(|d| !d.is_empty()));
    }

    #[test]
    fn test_builtin_handlers_all_registered() {
        let registry = HandlerRegistry::with_builtin_handlers();
        let builtins = crate::handlers::builtin_handlers();
        assert_eq!(registry.len(), builtins.len());
        for (name, _) in builtins {
            assert!(registry.contains(name));
        }
    }

    #[test]
    fn test_entries_sorted() {
        let mut registry = HandlerRegistry::with_builtin_handlers();
        registry.register("b_handler", no_effect).unwrap();
        registry.register("a_handler", no_effect).unwrap();
        let names: Vec<_> = registry.entries().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a_handler", "b_handler", "make_reflect"]);
        assert_eq!(registry.len(), 3);
    }
}
