//! A small interactive Unix shell.
//!
//! This crate implements the path from a raw command line to an executed
//! command graph: POSIX-like word splitting, pipeline planning and
//! redirection extraction, builtin-or-`PATH` resolution,
//! and an executor that wires stages together with anonymous pipes —
//! builtins in-process, externals as child processes. Interactive niceties
//! (prompt, history, first-word tab completion) sit on top of a cooked-line
//! editor.
//!
//! The main entry point is [`Interpreter`], which owns all cross-prompt
//! state and drives the read-eval loop. The public modules [`command`] and
//! [`env`] expose the types builtins and the executor are written against.

mod builtin;
pub mod command;
mod completer;
pub mod env;
mod executor;
mod external;
mod interpreter;
mod lexer;
mod parser;

/// Re-export of the interactive shell driver.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::Interpreter;
