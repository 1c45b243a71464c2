//! CLI subcommands.

pub mod decode;
pub mod files;
pub mod handlers;
pub mod pool;
pub mod run;
