//! Project configuration (flexgen.toml)
//!
//! ```toml
//! [run]
//! extensions = ["h", "hpp", "cpp"]
//! exclude = ["third_party/**", "*.gen.h"]
//! jobs = 4
//! keep_going = false
//!
//! [interpreter]
//! program = "cling"
//! args = ["--nologo"]
//! ```
//!
//! Command-line flags override every value here.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up by [`Config::discover`].
pub const CONFIG_FILE: &str = "flexgen.toml";

/// Extensions processed when the config names none.
pub const DEFAULT_EXTENSIONS: &[&str] = &["h", "hh", "hpp", "hxx", "c", "cc", "cpp", "cxx"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub interpreter: Option<InterpreterConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// File extensions to process, without the leading dot
    pub extensions: Vec<String>,
    /// Glob patterns of paths to skip
    pub exclude: Vec<String>,
    pub jobs: Option<usize>,
    pub keep_going: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude: Vec::new(),
            jobs: None,
            keep_going: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterpreterConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Config {
    /// Load a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validated()
    }

    /// Parse config text not tied to a file.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from(CONFIG_FILE),
            source,
        })?;
        config.validated()
    }

    /// Explicit file if given, otherwise the nearest `flexgen.toml` above
    /// the current directory, otherwise defaults. Returns the file used.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .and_then(|dir| Self::discover(&dir)),
        };
        match path {
            Some(path) => {
                tracing::debug!(config = %path.display(), "loading config");
                Ok((Self::from_file(&path)?, Some(path)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    /// Walk up from `start` to find `flexgen.toml`.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        let mut dir = start.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Compiled `run.exclude` patterns.
    pub fn exclude_patterns(&self) -> Result<Vec<glob::Pattern>, ConfigError> {
        self.run
            .exclude
            .iter()
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| {
                    ConfigError::Validation(format!("bad exclude pattern '{}': {}", p, e))
                })
            })
            .collect()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        for ext in &mut self.run.extensions {
            if let Some(stripped) = ext.strip_prefix('.') {
                *ext = stripped.to_string();
            }
            if ext.is_empty() {
                return Err(ConfigError::Validation(
                    "run.extensions cannot contain an empty extension".to_string(),
                ));
            }
        }
        if self.run.jobs == Some(0) {
            return Err(ConfigError::Validation(
                "run.jobs must be at least 1".to_string(),
            ));
        }
        if let Some(interpreter) = &self.interpreter {
            if interpreter.program.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "interpreter.program cannot be empty".to_string(),
                ));
            }
        }
        self.exclude_patterns()?;
        Ok(self)
    }
}
