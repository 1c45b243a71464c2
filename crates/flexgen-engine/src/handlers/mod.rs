//! Built-in handlers.

pub mod reflect;

pub use reflect::{MakeReflect, MemberTable, MAKE_REFLECT};

use crate::dispatch::Handler;

/// Every built-in handler with its registered name.
pub fn builtin_handlers() -> Vec<(&'static str, Box<dyn Handler>)> {
    vec![(MAKE_REFLECT, Box::new(MakeReflect))]
}
