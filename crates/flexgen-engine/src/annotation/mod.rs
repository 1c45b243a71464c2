//! Annotation markers and their decoded form.

pub mod command;
pub mod decode;

pub use command::{Command, CommandName, FlagSet, REFLECTABLE_FLAG};
pub use decode::{decode, decode_attributes, DecodeError, GEN_PREFIX};
