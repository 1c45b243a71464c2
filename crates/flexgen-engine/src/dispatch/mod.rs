//! Command registry and handler protocol.
//!
//! Handlers are registered by name at startup; `funccall` markers name the
//! handler to run. The registry is the only extension point: there is no
//! plugin loading.

pub mod handler;
pub mod registry;

pub use handler::{Handler, HandlerContext, HandlerError, HandlerResult, MemberFlags};
pub use registry::{DispatchError, HandlerRegistry};
