//! Request assembly and the interactive session loop.
//!
//! [`RequestAssembler`] is the single place where a turn happens: build the
//! message list, call the remote service, fold the exchange back into the
//! store, trim. [`repl`] wraps it in a line-oriented terminal loop.

pub mod assembler;
pub mod repl;

pub use assembler::RequestAssembler;
pub use repl::{run, Command};
